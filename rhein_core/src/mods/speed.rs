use super::{Mod, SessionParams};
use crate::error::ModError;

macro_rules! speed_mod {
    ($($ty:ident => ($id:expr, $name:expr, $speed:expr)),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $ty;

            impl $ty {
                pub const SPEED: f64 = $speed;
            }

            impl Mod for $ty {
                fn id(&self) -> i32 {
                    $id
                }

                fn name(&self) -> &'static str {
                    $name
                }

                fn cheat(&self) -> bool {
                    false
                }

                fn apply(&self, params: &mut SessionParams) -> Result<(), ModError> {
                    params.speed = Self::SPEED;
                    Ok(())
                }
            }
        )*
    };
}

speed_mod! {
    X055Mod => (6, "x0.55", 0.55),
    X070Mod => (9, "x0.70", 0.70),
    X080Mod => (11, "x0.80", 0.80),
    X085Mod => (12, "x0.85", 0.85),
    X110Mod => (15, "x1.10", 1.10),
    X130Mod => (17, "x1.30", 1.30),
    X160Mod => (20, "x1.60", 1.60),
    X170Mod => (21, "x1.70", 1.70),
    X200Mod => (24, "x2.00", 2.00),
}

/// Arbitrary playback speed. Rejected at setup if not a positive finite number.
#[derive(Debug, Clone, Copy)]
pub struct CustomSpeedMod {
    pub speed: f64,
}

impl CustomSpeedMod {
    pub const ID: i32 = 25;

    pub fn new(speed: f64) -> Self {
        Self { speed }
    }
}

impl Mod for CustomSpeedMod {
    fn id(&self) -> i32 {
        Self::ID
    }

    fn name(&self) -> &'static str {
        "x999"
    }

    fn cheat(&self) -> bool {
        false
    }

    fn apply(&self, params: &mut SessionParams) -> Result<(), ModError> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(ModError::InvalidSpeed(self.speed));
        }
        params.speed = self.speed;
        Ok(())
    }
}
