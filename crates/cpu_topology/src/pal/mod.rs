mod abstractions;
mod facade;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod unsupported;

pub(crate) use abstractions::*;
pub(crate) use facade::*;

#[cfg(target_os = "linux")]
pub(crate) use linux::{BUILD_TARGET_PLATFORM, BuildTargetPlatform};
#[cfg(not(target_os = "linux"))]
pub(crate) use unsupported::{BUILD_TARGET_PLATFORM, BuildTargetPlatform};
