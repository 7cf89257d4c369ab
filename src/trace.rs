//! Feature-gated `defmt` tracing. Compiled out entirely without the `defmt`
//! feature, so there's no cost (and no dependency) when it's off.

#[cfg(feature = "defmt")]
macro_rules! trace_event {
    ($($arg:tt)*) => { defmt::trace!($($arg)*) };
}

#[cfg(not(feature = "defmt"))]
macro_rules! trace_event {
    ($($arg:tt)*) => {};
}

pub(crate) use trace_event;
