use super::{Mod, SessionParams};
use crate::error::ModError;
use crate::gameplay::timing::TimingWindows;

macro_rules! timing_mod {
    ($(#[$meta:meta])* $ty:ident, $id:expr, $name:expr, $windows:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

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
                params.windows = $windows;
                Ok(())
            }
        }
    };
}

timing_mod!(
    /// Lenient-lite: every window 1..6 ms wider.
    ChillTimingMod,
    2,
    "Chill",
    TimingWindows::CHILL
);
timing_mod!(
    /// Every window 2..12 ms wider.
    LenientTimingMod,
    1,
    "Lenient",
    TimingWindows::LENIENT
);
timing_mod!(TightTimingMod, 3, "Tight", TimingWindows::TIGHT);
timing_mod!(StrictTimingMod, 4, "Strict", TimingWindows::STRICT);
