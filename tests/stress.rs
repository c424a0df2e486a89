#![cfg(all(feature = "std", not(loom)))]

use axiom_ticket::stress::{run, StressConfig, StressError};
use axiom_ticket::ThreadScope;

#[test]
fn every_scope_passes() {
    for scope in ThreadScope::ALL {
        let report = run(&StressConfig {
            threads: 4,
            iterations: 2_000,
            scope,
        })
        .unwrap();

        assert_eq!(report.scope, scope);
        assert_eq!(report.increments, 8_000);
        assert_eq!(report.max_holders, 1);
    }
}

#[test]
fn default_config_passes() {
    let config = StressConfig::default();
    let report = run(&config).unwrap();
    assert_eq!(
        report.increments,
        (config.threads * config.iterations) as u64
    );

    let text = report.to_string();
    assert!(text.contains("fifo:         ok"));
    assert!(text.contains("scope:        system"));
}

#[test]
fn invalid_config_is_rejected() {
    let err = run(&StressConfig {
        threads: 0,
        iterations: 10,
        scope: ThreadScope::Device,
    })
    .unwrap_err();

    assert!(matches!(err, StressError::InvalidConfig(_)));
    assert_eq!(
        err.to_string(),
        "invalid stress configuration: threads must be at least 1"
    );
}
