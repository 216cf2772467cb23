use carstate_core::mocks::PassthroughFilter;
use carstate_core::signals::{msg, sig};
use carstate_core::{
    CarState, CarStateNormalizer, CarVariant, KalmanSpeedFilter, SignalFrame, VehicleConfig,
};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn cruising_frame(spec: &carstate_core::SignalSpec) -> SignalFrame {
    let mut frame = SignalFrame::defaults(spec);
    for (m, s) in [
        (msg::WHEEL_SPEED_FRONT, sig::FL_WHEEL_SPD),
        (msg::WHEEL_SPEED_FRONT, sig::FR_WHEEL_SPD),
        (msg::WHEEL_SPEED_REAR, sig::RL_WHEEL_SPD),
        (msg::WHEEL_SPEED_REAR, sig::RR_WHEEL_SPD),
    ] {
        frame.set(m, s, 88.0);
    }
    frame.set(msg::PRNDL, sig::PRNDL, 4.0);
    frame.set(msg::ENGINE_STATUS, sig::CRUISE_MAIN_ON, 1.0);
    frame.set(msg::ACC_STATUS, sig::ACC_CMD_ACTIVE, 1.0);
    frame.set(msg::GAS_SENSOR, sig::INTERCEPTOR_GAS, 30.0);
    frame.set(msg::GAS_SENSOR, sig::INTERCEPTOR_GAS2, 31.0);
    frame
}

pub fn bench_normalize(c: &mut Criterion) {
    let mut g = c.benchmark_group("normalize");
    // BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p carstate_core --bench normalize
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE")
        && let Ok(n) = ss.parse::<usize>()
    {
        g.sample_size(n.max(10));
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }

    for (name, variant, interceptor) in [
        ("malibu", CarVariant::Malibu, false),
        ("volt_interceptor", CarVariant::Volt, true),
    ] {
        let n = CarStateNormalizer::new(VehicleConfig::new(variant, interceptor));
        let frame = cruising_frame(n.signal_spec());
        let prev = CarState::initial();

        g.bench_function(format!("update_{name}_passthrough"), |b| {
            let mut filter = PassthroughFilter;
            b.iter(|| black_box(n.update(black_box(&frame), &prev, &mut filter)));
        });
        g.bench_function(format!("update_{name}_kalman"), |b| {
            let mut filter = KalmanSpeedFilter::default();
            b.iter(|| black_box(n.update(black_box(&frame), &prev, &mut filter)));
        });
    }
    g.finish();
}

criterion_group!(normalize, bench_normalize);
criterion_main!(normalize);
