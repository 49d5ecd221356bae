//! GPIO / peripheral pin assignments for the ship-model sensor board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers or ADC channels.

// ---------------------------------------------------------------------------
// Analog inputs (ADC1, oneshot, 12 dB attenuation)
// ---------------------------------------------------------------------------

/// Rudder position potentiometer wiper.  ADC1 channel 3 (GPIO 4).
pub const RUDDER_ADC_CHANNEL: u32 = 3;
/// Motor temperature probe (analog voltage output).  ADC1 channel 4 (GPIO 5).
pub const MOTOR_TEMP_ADC_CHANNEL: u32 = 4;
/// Battery voltage through a 1:6 resistive divider.  ADC1 channel 5 (GPIO 6).
pub const BATTERY_VOLTAGE_ADC_CHANNEL: u32 = 5;
/// Hall current sensor output.  ADC1 channel 6 (GPIO 7).
pub const BATTERY_CURRENT_ADC_CHANNEL: u32 = 6;

/// Every ADC1 channel configured at boot.
pub const ADC_CHANNELS_IN_USE: [u32; 4] = [
    RUDDER_ADC_CHANNEL,
    MOTOR_TEMP_ADC_CHANNEL,
    BATTERY_VOLTAGE_ADC_CHANNEL,
    BATTERY_CURRENT_ADC_CHANNEL,
];

// ---------------------------------------------------------------------------
// Digital / pulse inputs
// ---------------------------------------------------------------------------

/// Shaft hall sensor, one or more pulses per propeller revolution
/// (rising edge, interrupt-driven, pull-down).
pub const SHAFT_PULSE_GPIO: i32 = 15;
/// Bilge water probe.  HIGH = water present.
pub const BILGE_WATER_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Navigation light LED driver (LEDC PWM).
pub const NAV_LIGHT_PWM_GPIO: i32 = 17;
/// LEDC frequency for the light driver (1 kHz).
pub const LIGHT_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// Shaft geometry
// ---------------------------------------------------------------------------

/// Magnets on the propeller shaft.
pub const SHAFT_IMPULSES_PER_ROTATION: u32 = 2;
