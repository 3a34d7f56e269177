use std::thread;
use std::time::Duration;

use crate::helpers::BootClock;
use crate::interfaces::{DigitalOutput, HardwareError, HumidityTemperatureSensor};

use super::models::{Measurement, SensorReading};

/// Holds the sensor power rail high; drops it low on every exit path.
struct PoweredRail<'a> {
    line: &'a mut dyn DigitalOutput,
}

impl<'a> PoweredRail<'a> {
    fn energize(line: &'a mut dyn DigitalOutput) -> Self {
        if let Err(e) = line.set_high() {
            log::error!("Failed to energize sensor: {}", e);
        }
        PoweredRail { line }
    }
}

impl Drop for PoweredRail<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.line.set_low() {
            log::error!("Failed to de-energize sensor: {}", e);
        }
    }
}

pub struct SensorSampler {
    sensor: Box<dyn HumidityTemperatureSensor>,
    power: Box<dyn DigitalOutput>,
    warmup: Duration,
    clock: BootClock,
}

impl SensorSampler {
    pub fn new(
        sensor: Box<dyn HumidityTemperatureSensor>,
        power: Box<dyn DigitalOutput>,
        warmup: Duration,
        clock: BootClock,
    ) -> Self {
        SensorSampler {
            sensor,
            power,
            warmup,
            clock,
        }
    }

    /// One powered read. No retry: the next wake cycle is the retry.
    pub fn read(&mut self) -> SensorReading {
        let rail = PoweredRail::energize(self.power.as_mut());
        if !self.warmup.is_zero() {
            thread::sleep(self.warmup);
        }
        let humidity = or_nan("humidity", self.sensor.read_humidity());
        let temperature = or_nan("temperature", self.sensor.read_temperature_f());
        drop(rail);

        let measurement = Measurement::from_raw(temperature, humidity);
        match measurement {
            Measurement::Valid {
                temperature_f,
                humidity_pct,
            } => log::info!(
                "Temperature: {:.2} F, humidity: {:.2} %",
                temperature_f,
                humidity_pct
            ),
            Measurement::Invalid => log::warn!(
                "Invalid sensor reading (temperature {}, humidity {})",
                temperature,
                humidity
            ),
        }
        SensorReading {
            measurement,
            timestamp_millis: self.clock.millis(),
        }
    }
}

fn or_nan(quantity: &str, value: Result<f32, HardwareError>) -> f32 {
    value.unwrap_or_else(|e| {
        log::warn!("Sensor {} read failed: {}", quantity, e);
        f32::NAN
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    struct FixedSensor {
        humidity: Result<f32, ()>,
        temperature: f32,
        rail: Rc<RefCell<Vec<bool>>>,
    }

    impl HumidityTemperatureSensor for FixedSensor {
        fn read_humidity(&mut self) -> Result<f32, HardwareError> {
            // Reads only ever happen with power applied
            assert_eq!(self.rail.borrow().last(), Some(&true));
            self.humidity.map_err(|_| HardwareError::Parse {
                path: PathBuf::from("in_humidityrelative_input"),
                value: String::new(),
            })
        }

        fn read_temperature_f(&mut self) -> Result<f32, HardwareError> {
            Ok(self.temperature)
        }
    }

    struct RecordingRail(Rc<RefCell<Vec<bool>>>);

    impl DigitalOutput for RecordingRail {
        fn set_high(&mut self) -> Result<(), HardwareError> {
            self.0.borrow_mut().push(true);
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), HardwareError> {
            self.0.borrow_mut().push(false);
            Ok(())
        }
    }

    fn sample(humidity: Result<f32, ()>, temperature: f32) -> (SensorReading, Vec<bool>) {
        let rail = Rc::new(RefCell::new(Vec::new()));
        let sensor = FixedSensor {
            humidity,
            temperature,
            rail: rail.clone(),
        };
        let mut sampler = SensorSampler::new(
            Box::new(sensor),
            Box::new(RecordingRail(rail.clone())),
            Duration::ZERO,
            BootClock::start(),
        );
        let reading = sampler.read();
        let transitions = rail.borrow().clone();
        (reading, transitions)
    }

    #[test]
    fn valid_read_powers_sensor_on_then_off() {
        let (reading, rail) = sample(Ok(41.0), 72.3);
        assert_eq!(
            reading.measurement,
            Measurement::Valid {
                temperature_f: 72.3,
                humidity_pct: 41.0
            }
        );
        assert_eq!(rail, vec![true, false]);
    }

    #[test]
    fn single_nan_makes_reading_invalid_and_powers_off() {
        let (reading, rail) = sample(Ok(41.0), f32::NAN);
        assert!(!reading.is_valid());
        assert_eq!(rail, vec![true, false]);

        let (reading, rail) = sample(Ok(f32::NAN), 72.3);
        assert!(!reading.is_valid());
        assert_eq!(rail, vec![true, false]);
    }

    #[test]
    fn driver_error_makes_reading_invalid() {
        let (reading, rail) = sample(Err(()), 72.3);
        assert_eq!(reading.measurement, Measurement::Invalid);
        assert_eq!(rail, vec![true, false]);
    }
}
