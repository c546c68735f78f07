use focus_reco::config::{EngineConfig, RetentionProxyConfig};
use focus_reco::metrics::normalize;
use focus_reco::reason::compose_reason;
use focus_reco::scoring::decide_focus;
use focus_reco::{Focus, Metrics};

fn base_metrics(niche: &str) -> Metrics {
    Metrics {
        niche: niche.to_string(),
        ..Metrics::default()
    }
}

#[test]
fn percent_and_fraction_normalize_identically() {
    let proxy = RetentionProxyConfig::default();

    let mut as_percent = base_metrics("fitness");
    as_percent.retention = Some(45.0);
    let mut as_fraction = base_metrics("fitness");
    as_fraction.retention = Some(0.45);

    let a = normalize(as_percent, &proxy);
    let b = normalize(as_fraction, &proxy);

    assert!((a.retention.unwrap() - 0.45).abs() < 1e-9);
    assert!((b.retention.unwrap() - 0.45).abs() < 1e-9);
}

#[test]
fn normalization_is_idempotent() {
    let proxy = RetentionProxyConfig::default();

    let mut metrics = base_metrics("tech");
    metrics.ctr = Some(3.0);
    metrics.avg_watch_pct = Some(52.0);
    metrics.clicks = Some(40);
    metrics.impressions = Some(1800);
    metrics.likes = Some(25);
    metrics.comments = Some(4);

    let once = normalize(metrics, &proxy);
    let twice = normalize(once.clone(), &proxy);

    assert_eq!(once, twice);
}

#[test]
fn ctr_derived_only_with_positive_impressions() {
    let proxy = RetentionProxyConfig::default();

    let mut metrics = base_metrics("tech");
    metrics.clicks = Some(30);
    let normalized = normalize(metrics, &proxy);
    assert!(normalized.ctr.is_none());

    let mut metrics = base_metrics("tech");
    metrics.clicks = Some(30);
    metrics.impressions = Some(0);
    let normalized = normalize(metrics, &proxy);
    assert!(normalized.ctr.is_none());

    let mut metrics = base_metrics("tech");
    metrics.clicks = Some(30);
    metrics.impressions = Some(1500);
    let normalized = normalize(metrics, &proxy);
    assert!((normalized.ctr.unwrap() - 0.02).abs() < 1e-9);
}

#[test]
fn retention_proxy_clamped_to_conservative_band() {
    let proxy = RetentionProxyConfig::default();

    // Sparse engagement over a large denominator hits the floor.
    let mut quiet = base_metrics("tech");
    quiet.impressions = Some(100_000);
    quiet.likes = Some(3);
    let quiet = normalize(quiet, &proxy);
    assert!((quiet.retention.unwrap() - proxy.floor).abs() < 1e-9);

    // Heavy engagement over a small denominator hits the ceiling.
    let mut loud = base_metrics("tech");
    loud.impressions = Some(100);
    loud.likes = Some(500);
    loud.saves = Some(200);
    let loud = normalize(loud, &proxy);
    assert!((loud.retention.unwrap() - proxy.ceiling).abs() < 1e-9);

    // No denominator at all: retention stays absent, never fabricated.
    let mut orphan = base_metrics("tech");
    orphan.likes = Some(50);
    let orphan = normalize(orphan, &proxy);
    assert!(orphan.retention.is_none());
}

#[test]
fn direct_watch_signals_beat_the_proxy() {
    let proxy = RetentionProxyConfig::default();

    let mut metrics = base_metrics("tech");
    metrics.avg_watch_pct = Some(0.30);
    metrics.impressions = Some(1000);
    metrics.likes = Some(900);

    let normalized = normalize(metrics, &proxy);
    assert!((normalized.retention.unwrap() - 0.30).abs() < 1e-9);
}

#[test]
fn scores_stay_in_unit_interval() {
    let config = EngineConfig::default();
    let proxy = &config.proxy;

    let samples = vec![
        base_metrics("tech"),
        {
            let mut m = base_metrics("tech");
            m.ctr = Some(0.01);
            m.reach = Some(200);
            m.impressions = Some(900);
            m.retention = Some(0.6);
            m.freq = Some(1.0);
            m
        },
        {
            let mut m = base_metrics("boxing");
            m.clicks = Some(400);
            m.impressions = Some(5000);
            m.conversions = Some(0);
            m.saves = Some(2);
            m
        },
    ];

    for sample in samples {
        let normalized = normalize(sample, proxy);
        let decision = decide_focus(&normalized, &config);
        for score in [
            decision.scores.discovery,
            decision.scores.retention,
            decision.scores.conversion,
        ] {
            assert!(score >= 0.0);
            assert!(score <= 1.0 + 1e-9);
        }
    }
}

#[test]
fn low_ctr_low_reach_good_retention_points_at_discovery() {
    let config = EngineConfig::default();

    let mut metrics = base_metrics("fitness");
    metrics.ctr = Some(0.01);
    metrics.reach = Some(500);
    metrics.impressions = Some(1500);
    metrics.retention = Some(0.5);

    let normalized = normalize(metrics, &config.proxy);
    let decision = decide_focus(&normalized, &config);

    assert_eq!(decision.focus, Focus::Discovery);
    assert!((decision.scores.discovery - 1.0).abs() < 1e-6);
}

#[test]
fn validated_traffic_without_conversions_points_at_conversion() {
    let config = EngineConfig::default();

    let mut metrics = base_metrics("fitness");
    metrics.clicks = Some(120);
    metrics.impressions = Some(2000);
    metrics.conversions = Some(0);

    let normalized = normalize(metrics, &config.proxy);
    assert!((normalized.ctr.unwrap() - 0.06).abs() < 1e-9);

    let decision = decide_focus(&normalized, &config);

    // Retention and conversion land on the same score here; the tie breaks
    // toward the more actionable objective.
    assert!((decision.scores.retention - decision.scores.conversion).abs() < 1e-9);
    assert_eq!(decision.focus, Focus::Conversion);
}

#[test]
fn sparse_metrics_default_to_retention() {
    let config = EngineConfig::default();

    let normalized = normalize(base_metrics("tech"), &config.proxy);
    let decision = decide_focus(&normalized, &config);

    assert_eq!(decision.focus, Focus::Retention);
    assert!((decision.scores.discovery - 0.0).abs() < 1e-9);
    assert!((decision.scores.conversion - 0.0).abs() < 1e-9);
}

#[test]
fn reason_renders_no_data_for_absent_metrics() {
    let metrics = base_metrics("fisioterapia");

    let discovery = compose_reason(Focus::Discovery, &metrics);
    assert!(discovery.contains("no data"));

    let retention = compose_reason(Focus::Retention, &metrics);
    assert!(retention.contains("no data"));
    assert!(retention.contains("fisioterapia"));

    let conversion = compose_reason(Focus::Conversion, &metrics);
    assert!(conversion.contains("no data"));
}

#[test]
fn reason_is_deterministic() {
    let mut metrics = base_metrics("tech");
    metrics.ctr = Some(0.03);
    metrics.reach = Some(800);

    let first = compose_reason(Focus::Discovery, &metrics);
    let second = compose_reason(Focus::Discovery, &metrics);
    assert_eq!(first, second);
}
