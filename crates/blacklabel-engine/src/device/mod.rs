//! wgpu device and window surface.
//!
//! [`Gpu`] owns the instance, device, queue and the configured surface of
//! the page window; [`GpuFrame`] is one acquired swapchain image with its
//! encoder. Surface policy (format, alpha, resize, error recovery) lives in
//! `surface`.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
