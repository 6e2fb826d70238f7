#[cfg(test)]
mod tests {
    use resilience_engine::flows::panarchy_influence;
    use resilience_engine::pressure::environmental_pressure;
    use resilience_engine::*;
    use serde_json::json;

    fn overrides(v: serde_json::Value) -> Overrides {
        match v {
            serde_json::Value::Object(map) => map,
            _ => panic!("test: overrides must be an object"),
        }
    }

    fn assert_stocks_bounded(sim: &ResilienceSimulation) {
        for (i, sample) in sim.history_log().iter().enumerate() {
            for (name, v) in STOCK_NAMES.iter().zip(sample.stocks.to_array()) {
                assert!((0.0..=1.0).contains(&v), "tick {}: {} = {} out of [0,1]", i, name, v);
            }
        }
    }

    // ========== Scenario: default run ==========

    #[test]
    fn test_default_run_of_100_ticks() {
        let mut sim = ResilienceSimulation::default();
        let history = sim.run_core(100).expect("run");

        assert_eq!(history.len(), 100);
        assert_eq!(history.as_slice()[99].time, 49.5);
        assert_eq!(history.as_slice()[0].time, 0.0);
        assert_eq!(history.as_slice()[0].panarchy_phase, PanarchyPhase::Exploitation);
        assert_eq!(sim.time(), 50.0);
    }

    #[test]
    fn test_history_grows_one_sample_per_step() {
        let mut sim = ResilienceSimulation::default();
        for n in 1..=25 {
            sim.step_core().expect("step");
            assert_eq!(sim.history_log().len(), n);
            assert_eq!(sim.history_log().last().map(|s| s.time), Some((n - 1) as f64 * DT));
        }
    }

    #[test]
    fn test_run_returns_full_history() {
        let mut sim = ResilienceSimulation::default();
        sim.run_core(10).expect("run");
        let len = sim.run_core(5).expect("run").len();
        assert_eq!(len, 15);
    }

    // ========== Stock bounds ==========

    #[test]
    fn test_stocks_bounded_over_full_year() {
        let mut sim = ResilienceSimulation::default();
        sim.run_complete_core().expect("run");
        assert_stocks_bounded(&sim);
    }

    #[test]
    fn test_stocks_bounded_with_out_of_range_params() {
        let mut sim = ResilienceSimulation::with_overrides(&overrides(json!({
            "learning_rate": 25.0,
            "adaptation_rate": -4.0,
            "crisis_intensity": 9.0,
            "social_connectivity_baseline": 3.0,
            "transformation_threshold": -1.0,
        })))
        .expect("construct");
        assert_eq!(sim.params().learning_rate, 25.0, "no clamping of parameters");
        sim.run_core(800).expect("run");
        assert_stocks_bounded(&sim);
    }

    // ========== Panarchy cycle ==========

    #[test]
    fn test_panarchy_phase_durations() {
        let mut sim = ResilienceSimulation::default();
        let mut updates = 0;
        let mut visits = Vec::new();
        let mut phases = Vec::new();
        while visits.len() < 5 {
            let before = sim.panarchy().phase;
            sim.step_core().expect("step");
            if sim.panarchy().phase_time == 0.0 {
                visits.push(updates);
                phases.push(before);
                updates = 0;
            } else {
                updates += 1;
            }
        }
        assert_eq!(visits, vec![180, 120, 60, 100, 180]);
        assert_eq!(
            phases,
            vec![
                PanarchyPhase::Exploitation,
                PanarchyPhase::Conservation,
                PanarchyPhase::Release,
                PanarchyPhase::Reorganization,
                PanarchyPhase::Exploitation,
            ]
        );

        let first_r = sim
            .history_log()
            .iter()
            .take_while(|s| s.panarchy_phase == PanarchyPhase::Exploitation)
            .count();
        assert_eq!(first_r, 180);
    }

    #[test]
    fn test_panarchy_disabled_is_frozen_and_inert() {
        let mut sim = ResilienceSimulation::default();
        sim.run_core(30).expect("run");
        sim.configure_core(&overrides(json!({"panarchy_enabled": false}))).expect("configure");

        for _ in 0..10 {
            let sample = sim.step_core().expect("step");
            assert_eq!(sample.panarchy_potential, 0.5);
            assert_eq!(sample.panarchy_connectedness, 0.3);
            assert_eq!(sample.panarchy_resilience, 0.7);
            assert_eq!(sample.panarchy_phase, PanarchyPhase::Exploitation);
            assert_eq!(panarchy_influence(sim.panarchy(), sim.params()), 0.0);
        }
        assert_eq!(*sim.panarchy(), PanarchyState::INITIAL);
    }

    #[test]
    fn test_panarchy_lifts_community_resilience() {
        let mut on = ResilienceSimulation::default();
        let mut off = ResilienceSimulation::with_overrides(&overrides(json!({"panarchy_enabled": false})))
            .expect("construct");
        on.run_core(50).expect("run");
        off.run_core(50).expect("run");
        assert!(on.stocks().community_resilience > off.stocks().community_resilience);
    }

    // ========== Determinism & reset ==========

    #[test]
    fn test_identical_configs_produce_identical_histories() {
        let o = overrides(json!({"crisis_start": 120, "crisis_intensity": 0.9, "cycle_duration": 30}));
        let mut a = ResilienceSimulation::with_overrides(&o).expect("construct");
        let mut b = ResilienceSimulation::with_overrides(&o).expect("construct");
        a.run_core(600).expect("run");
        b.run_core(600).expect("run");

        assert_eq!(a.history_log(), b.history_log());
        let ja = a.history_log().to_json().expect("json");
        let jb = b.history_log().to_json().expect("json");
        assert_eq!(ja.as_bytes(), jb.as_bytes());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        for ticks in [0, 1, 37, 900] {
            let mut sim = ResilienceSimulation::with_overrides(&overrides(json!({"learning_rate": 0.6})))
                .expect("construct");
            sim.run_core(ticks).expect("run");
            sim.reset();

            assert_eq!(
                sim.stocks().to_array(),
                [0.3, 0.2, 0.4, 0.5, 0.1, 0.3, 0.2, 0.1]
            );
            let p = sim.panarchy();
            assert_eq!(
                (p.potential, p.connectedness, p.resilience, p.phase, p.phase_time),
                (0.5, 0.3, 0.7, PanarchyPhase::Exploitation, 0.0)
            );
            assert_eq!(*sim.signals(), ActivationSignals::default());
            assert_eq!(sim.time(), 0.0);
            assert!(sim.history_log().is_empty());
            assert_eq!(sim.params().learning_rate, 0.6, "reset keeps parameters");
        }
    }

    #[test]
    fn test_reset_then_rerun_matches_fresh_run() {
        let mut reused = ResilienceSimulation::default();
        reused.run_core(333).expect("run");
        reused.reset();
        reused.run_core(200).expect("run");

        let mut fresh = ResilienceSimulation::default();
        fresh.run_core(200).expect("run");
        assert_eq!(reused.history_log(), fresh.history_log());
    }

    // ========== Environmental pressure & crisis ==========

    #[test]
    fn test_pressure_golden_value_at_day_60() {
        let mut sim = ResilienceSimulation::default();
        sim.run_core(121).expect("run");
        let sample = sim.history_log().as_slice()[120];
        assert_eq!(sample.time, 60.0);

        let vuca = ParameterSet::default().vuca_factor();
        let expected = 0.5 + 0.2 * (2.0 * std::f64::consts::PI * 60.0 / 365.0).sin() + 0.5 * vuca;
        assert!((sample.environmental_pressure - expected).abs() < 1e-12);
        assert_eq!(
            sample.environmental_pressure,
            environmental_pressure(60.0, &ParameterSet::default())
        );
    }

    #[test]
    fn test_crisis_mode_tracks_crisis_window() {
        let mut sim = ResilienceSimulation::default();
        sim.run_core(200).expect("run");
        let history = sim.history_log();

        assert!(history.iter().filter(|s| s.time < 50.0).all(|s| s.signals.crisis_mode == 0.0));
        let peak = history
            .iter()
            .filter(|s| (50.0..=70.0).contains(&s.time))
            .map(|s| s.signals.crisis_mode)
            .fold(0.0, f64::max);
        assert!(peak > 0.9, "crisis mode peaked at {}", peak);
        let last = history.last().map(|s| s.signals.crisis_mode).unwrap_or(1.0);
        assert!(last < 0.01, "crisis mode should decay after the window, got {}", last);
    }

    #[test]
    fn test_secondary_crisis_ignores_parameters() {
        let mut sim = ResilienceSimulation::with_overrides(&overrides(json!({"crisis_intensity": 0.0})))
            .expect("construct");
        sim.run_core(441).expect("run");
        let sample = sim.history_log().as_slice()[420];
        assert_eq!(sample.time, 210.0);
        let seasonal = 0.5 + 0.2 * (2.0 * std::f64::consts::PI * 210.0 / 365.0).sin();
        let vuca = ParameterSet::default().vuca_factor();
        assert!((sample.environmental_pressure - (seasonal + 0.4 * vuca)).abs() < 1e-12);
    }

    // ========== Configuration ==========

    #[test]
    fn test_unknown_and_malformed_keys_ignored() {
        let mut sim = ResilienceSimulation::default();
        sim.configure_core(&overrides(json!({
            "not_a_param": 1.0,
            "learning_rate": "very high",
            "adaptation_rate": 0.3,
        })))
        .expect("configure");
        let expected = ParameterSet { adaptation_rate: 0.3, ..ParameterSet::default() };
        assert_eq!(*sim.params(), expected);
    }

    #[test]
    fn test_configure_discards_history() {
        let mut sim = ResilienceSimulation::default();
        sim.run_core(40).expect("run");
        sim.configure_core(&overrides(json!({"crisis_intensity": 0.2}))).expect("configure");
        assert!(sim.history_log().is_empty());
        assert_eq!(sim.time(), 0.0);
        assert_eq!(*sim.stocks(), Stocks::INITIAL);
    }

    #[test]
    fn test_non_finite_strings_cannot_poison_stocks() {
        let mut sim = ResilienceSimulation::with_overrides(&overrides(json!({
            "learning_rate": "NaN",
            "adaptation_rate": "inf",
            "crisis_intensity": "-inf",
        })))
        .expect("construct");
        assert_eq!(*sim.params(), ParameterSet::default());
        sim.run_core(200).expect("run");
        assert_stocks_bounded(&sim);
    }

    #[test]
    fn test_zero_cycle_duration_fails_fast() {
        let err = ResilienceSimulation::with_overrides(&overrides(json!({"cycle_duration": 0})));
        assert!(matches!(err, Err(Error::InvalidParameter { name: "cycle_duration", .. })));
    }

    #[test]
    fn test_feedback_strength_has_no_effect() {
        let mut a = ResilienceSimulation::with_overrides(&overrides(json!({"feedback_strength": 0.0})))
            .expect("construct");
        let mut b = ResilienceSimulation::with_overrides(&overrides(json!({"feedback_strength": 1.0})))
            .expect("construct");
        a.run_core(300).expect("run");
        b.run_core(300).expect("run");
        assert_eq!(a.history_log(), b.history_log());
    }

    // ========== Assistant boundary ==========

    #[test]
    fn test_assistant_changes_flow_through_configure() {
        let mut sim = ResilienceSimulation::default();
        sim.run_core(20).expect("run");
        let summary = sim
            .apply_assistant_core(
                r#"{"summary": "Scheduling a strong crisis at day 100 for 25 days.",
                    "parameter_changes": {"crisis_intensity": 0.9, "crisis_start": 100, "crisis_duration": 25}}"#,
            )
            .expect("apply");
        assert!(summary.contains("day 100"));
        assert_eq!(sim.params().crisis_start, 100.0);
        assert_eq!(sim.params().crisis_duration, 25.0);
        assert!(sim.history_log().is_empty());

        sim.run_core(250).expect("run");
        let in_crisis = sim.history_log().as_slice()[230];
        assert_eq!(in_crisis.time, 115.0);
        assert!(in_crisis.signals.crisis_mode > 0.5);
    }

    #[test]
    fn test_clarifying_reply_keeps_configuration() {
        let mut sim = ResilienceSimulation::with_overrides(&overrides(json!({"learning_rate": 0.9})))
            .expect("construct");
        sim.run_core(40).expect("run");
        let before = sim.history_log().clone();

        let summary = sim
            .apply_assistant_core(
                r#"{"summary": "Could you say which crisis you mean?", "parameter_changes": {}}"#,
            )
            .expect("apply");
        assert!(summary.starts_with("Could you"));
        assert_eq!(sim.params().learning_rate, 0.9);
        assert_eq!(sim.history_log().len(), 40);
        assert_eq!(*sim.history_log(), before);
        assert_eq!(sim.time(), 20.0);
    }

    #[test]
    fn test_history_exports_jsonl() {
        let mut sim = ResilienceSimulation::default();
        sim.run_core(12).expect("run");
        let path = std::env::temp_dir()
            .join(format!("resilience-sim-{}", std::process::id()))
            .join("history.jsonl");
        sim.history_log().write_jsonl(&path).expect("write");
        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text.lines().count(), 12);
        assert!(text.lines().all(|l| l.contains("\"panarchy_phase\":\"r\"")));
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}
