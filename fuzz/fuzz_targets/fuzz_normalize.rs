#![no_main]
use carstate_core::mocks::PassthroughFilter;
use carstate_core::{CarState, CarStateNormalizer, CarVariant, SignalFrame, VehicleConfig};
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    variant: u8,
    interceptor: bool,
    prev_buttons: i64,
    values: Vec<f64>,
}

fuzz_target!(|input: Input| {
    let variant = CarVariant::ALL[usize::from(input.variant) % CarVariant::ALL.len()];
    let n = CarStateNormalizer::new(VehicleConfig::new(variant, input.interceptor));

    // Feed every registered signal, cycling through the fuzzed values (NaN and inf included).
    let mut frame = SignalFrame::new();
    if !input.values.is_empty() {
        for (i, e) in n.signal_spec().iter().enumerate() {
            frame.set(e.message, e.signal, input.values[i % input.values.len()]);
        }
    }
    let prev = CarState {
        cruise_buttons: input.prev_buttons,
        ..CarState::initial()
    };

    let s = n.update(&frame, &prev, &mut PassthroughFilter);
    assert_eq!(s.prev_cruise_buttons, input.prev_buttons);
    assert!(!(s.left_blinker && s.right_blinker));
    if !variant.has_regen_paddle() {
        assert!(!s.regen_pressed);
    }
});
