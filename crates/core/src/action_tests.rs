// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn install_pup_display_name() {
    let a = Action::InstallPup {
        name: "plex".into(),
        version: "1.0".into(),
        source_id: "core".into(),
        options: HashMap::new(),
    };
    assert_eq!(a.display_name(None), "Install plex");
}

#[test]
fn install_pups_batch_display_name() {
    let many = Action::InstallPups(vec![
        InstallPupSpec {
            name: "a".into(),
            version: "1".into(),
            source_id: "core".into(),
            options: HashMap::new(),
        },
        InstallPupSpec {
            name: "b".into(),
            version: "1".into(),
            source_id: "core".into(),
            options: HashMap::new(),
        },
    ]);
    assert_eq!(many.display_name(None), "Install 2 Pups");

    let one = Action::InstallPups(vec![InstallPupSpec {
        name: "solo".into(),
        version: "1".into(),
        source_id: "core".into(),
        options: HashMap::new(),
    }]);
    assert_eq!(one.display_name(None), "Install solo");
}

#[test]
fn uninstall_falls_back_without_pup_name() {
    let a = Action::UninstallPup {
        pup_id: "p1".into(),
    };
    assert_eq!(a.display_name(None), "Uninstall Pup");
    assert_eq!(a.display_name(Some("plex")), "Uninstall plex");
}

#[test]
fn purge_falls_back_without_pup_name() {
    let a = Action::PurgePup {
        pup_id: "p1".into(),
    };
    assert_eq!(a.display_name(None), "Purge Pup");
    assert_eq!(a.display_name(Some("plex")), "Purge plex");
}

#[test]
fn untracked_actions() {
    assert!(!Action::UpdateMetrics {
        pup_id: "p".into(),
        metrics: HashMap::new(),
    }
    .is_tracked());
    assert!(!Action::UpdatePupConfig {
        pup_id: "p".into(),
        values: HashMap::new(),
    }
    .is_tracked());
    assert!(!Action::UpdatePupHooks {
        pup_id: "p".into(),
        hooks: vec![],
    }
    .is_tracked());
    assert!(!Action::InstallPups(vec![]).is_tracked());
}

#[test]
fn tracked_actions() {
    assert!(Action::EnablePup {
        pup_id: "p".into(),
    }
    .is_tracked());
    assert!(Action::InstallPup {
        name: "p".into(),
        version: "1".into(),
        source_id: "core".into(),
        options: HashMap::new(),
    }
    .is_tracked());
    assert!(Action::SystemUpdate {
        pkg: "dbxd".into(),
        version: "1".into(),
    }
    .is_tracked());
}

#[test]
fn inline_actions() {
    assert!(Action::UpdatePupConfig {
        pup_id: "p".into(),
        values: HashMap::new(),
    }
    .is_inline());
    assert!(Action::UpdatePupProviders {
        pup_id: "p".into(),
        providers: HashMap::new(),
    }
    .is_inline());
    assert!(!Action::EnablePup {
        pup_id: "p".into(),
    }
    .is_inline());
}

#[test]
fn pup_id_extraction() {
    let a = Action::DisablePup {
        pup_id: "p9".into(),
    };
    assert_eq!(a.pup_id(), Some("p9"));
    assert_eq!(Action::EnableSsh.pup_id(), None);
}

#[test]
fn serde_round_trip_tags_variant() {
    let a = Action::EnableSsh;
    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["kind"], "enable_ssh");
    let back: Action = serde_json::from_value(json).unwrap();
    assert_eq!(back, a);
}
