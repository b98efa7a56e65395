use accident_detection::{predict, AccidentDetector, FusionConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use telemetry::{GpsReading, SensorFrame, Vector3};

fn bench_predict(c: &mut Criterion) {
    let config = FusionConfig::default();
    let frame = SensorFrame::now()
        .with_acceleration(Vector3::new(-25.0, 5.0, -8.0))
        .with_gyroscope(Vector3::new(2.0, 7.0, 1.0))
        .with_gps(GpsReading {
            latitude: 12.9716,
            longitude: 77.5946,
            speed: 15.0,
        })
        .with_audio_level(95.0);
    let history = [50.0, 48.0, 45.0, 42.0, 20.0];

    c.bench_function("predict_collision", |b| {
        b.iter(|| predict(black_box(&frame), black_box(&history), &config))
    });
}

fn bench_evaluate_record(c: &mut Criterion) {
    let detector = AccidentDetector::new(FusionConfig::default());
    let raw = json!({
        "timestamp": "2024-03-01T08:30:00Z",
        "accelerometer": {"x": 1.0, "y": 0.5, "z": 9.8},
        "gyroscope": {"x": 0.1, "y": 0.2, "z": 0.1},
        "gps": {"latitude": 12.9716, "longitude": 77.5946, "speed": 45.0},
        "audio_level": 60.0
    });
    let history = [44.0, 45.0, 46.0];

    c.bench_function("evaluate_record_normal", |b| {
        b.iter(|| detector.evaluate_record(black_box(&raw), black_box(&history)))
    });
}

criterion_group!(benches, bench_predict, bench_evaluate_record);
criterion_main!(benches);
