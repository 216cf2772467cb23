//! End-to-end cycles through `CarStateNormalizer::update` with fixed inputs.

use carstate_core::mocks::PassthroughFilter;
use carstate_core::signals::{msg, sig};
use carstate_core::{
    CarState, CarStateNormalizer, CarVariant, GearShifter, SignalFrame, VehicleConfig,
};
use rstest::rstest;

fn normalize(variant: CarVariant, interceptor: bool, frame: SignalFrame) -> CarState {
    let n = CarStateNormalizer::new(VehicleConfig::new(variant, interceptor));
    n.update(&frame, &CarState::initial(), &mut PassthroughFilter)
}

fn brake(raw: f64) -> SignalFrame {
    SignalFrame::new().with(msg::BRAKE_PEDAL, sig::BRAKE_PEDAL_POSITION, raw)
}

#[test]
fn brake_noise_at_rest_is_suppressed() {
    let s = normalize(CarVariant::Malibu, false, brake(5.0));
    assert_eq!(s.brake, 0.0);
    assert!(!s.brake_pressed);
}

#[test]
fn brake_above_deadband_scales_by_full_scale() {
    let s = normalize(CarVariant::Malibu, false, brake(50.0));
    assert_eq!(s.brake, 50.0 / 208.0);
    assert!((s.brake - 0.2404).abs() < 1e-4);
    assert!(s.brake_pressed);
}

#[test]
fn equal_wheel_speeds_convert_to_ms() {
    let frame = SignalFrame::new()
        .with(msg::WHEEL_SPEED_FRONT, sig::FL_WHEEL_SPD, 10.0)
        .with(msg::WHEEL_SPEED_FRONT, sig::FR_WHEEL_SPD, 10.0)
        .with(msg::WHEEL_SPEED_REAR, sig::RL_WHEEL_SPD, 10.0)
        .with(msg::WHEEL_SPEED_REAR, sig::RR_WHEEL_SPD, 10.0);
    let s = normalize(CarVariant::Acadia, false, frame);
    assert!((s.v_ego_raw - 2.78).abs() < 0.01, "got {}", s.v_ego_raw);
    assert_eq!(s.v_ego, s.v_ego_raw);
    assert!(!s.standstill);
}

#[rstest]
#[case(15.0, 15.0, false)]
#[case(25.0, 25.0, true)]
#[case(20.0, 20.0, false)]
#[case(0.0, 41.0, true)]
fn interceptor_average_drives_gas_pressed(
    #[case] ch1: f64,
    #[case] ch2: f64,
    #[case] pressed: bool,
) {
    let frame = SignalFrame::new()
        .with(msg::GAS_SENSOR, sig::INTERCEPTOR_GAS, ch1)
        .with(msg::GAS_SENSOR, sig::INTERCEPTOR_GAS2, ch2)
        // the primary pedal is ignored with the interceptor fitted
        .with(msg::ACCELERATOR, sig::ACCELERATOR_PEDAL, 200.0);
    let s = normalize(CarVariant::Volt, true, frame);
    assert_eq!(s.gas_pressed, pressed);
    assert_eq!(s.gas, (ch1 + ch2) / 2.0);
}

#[test]
fn any_open_door_reports_open() {
    let frame = SignalFrame::new()
        .with(msg::DOOR_BELT, sig::FRONT_LEFT_DOOR, 1.0)
        .with(msg::DOOR_BELT, sig::FRONT_RIGHT_DOOR, 0.0)
        .with(msg::DOOR_BELT, sig::REAR_LEFT_DOOR, 0.0)
        .with(msg::DOOR_BELT, sig::REAR_RIGHT_DOOR, 0.0);
    assert!(normalize(CarVariant::BuickRegal, false, frame).door_open);
}

#[rstest]
#[case(1.0, GearShifter::Park)]
#[case(2.0, GearShifter::Reverse)]
#[case(3.0, GearShifter::Neutral)]
#[case(4.0, GearShifter::Drive)]
#[case(6.0, GearShifter::Low)]
#[case(5.0, GearShifter::Unknown)]
#[case(42.0, GearShifter::Unknown)]
fn gear_codes_decode(#[case] raw: f64, #[case] gear: GearShifter) {
    let frame = SignalFrame::new().with(msg::PRNDL, sig::PRNDL, raw);
    assert_eq!(normalize(CarVariant::CadillacAts, false, frame).gear_shifter, gear);
}

#[rstest]
#[case(CarVariant::Malibu, 4, true)]
#[case(CarVariant::CadillacCt6, 4, false)]
#[case(CarVariant::CadillacCt6, 6, false)]
#[case(CarVariant::CadillacCt6, 3, true)]
#[case(CarVariant::Acadia, 1, false)]
fn steer_warning_follows_eps_status(
    #[case] variant: CarVariant,
    #[case] status: i64,
    #[case] warning: bool,
) {
    let frame =
        SignalFrame::new().with(msg::PSCM_STATUS, sig::TORQUE_DELIVERED_STATUS, status as f64);
    assert_eq!(normalize(variant, false, frame).steer_warning, warning);
}

#[rstest]
#[case(CarVariant::Volt, true)]
#[case(CarVariant::Bolt, true)]
#[case(CarVariant::Malibu, false)]
fn regen_paddle_only_on_electric_variants(#[case] variant: CarVariant, #[case] pressed: bool) {
    let frame = SignalFrame::new().with(msg::REGEN_PADDLE, sig::REGEN_PADDLE, 1.0);
    assert_eq!(normalize(variant, false, frame).regen_pressed, pressed);
}

#[test]
fn garbled_values_fall_back_to_defaults() {
    let frame = brake(f64::NAN)
        .with(msg::WHEEL_SPEED_FRONT, sig::FL_WHEEL_SPD, f64::INFINITY)
        .with(msg::STEERING_BUTTON, sig::ACC_BUTTONS, f64::NAN);
    let s = normalize(CarVariant::Malibu, false, frame);
    assert_eq!(s.brake, 0.0);
    assert_eq!(s.wheel_speeds.fl, 0.0);
    assert!(s.v_ego_raw.is_finite());
    assert_eq!(s.cruise_buttons, carstate_core::CruiseButtons::UNPRESS);
}

#[test]
fn serialized_state_uses_camel_case() {
    let s = normalize(CarVariant::Malibu, false, brake(50.0));
    let v = serde_json::to_value(&s).unwrap();
    assert_eq!(v["brakePressed"], serde_json::json!(true));
    assert_eq!(v["gearShifter"], serde_json::json!("unknown"));
    assert!(v.get("vEgoRaw").is_some());
}
