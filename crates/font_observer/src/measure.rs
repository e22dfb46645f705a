//! Text measurement collaborator and the scoped ruler built on it.

use anyhow::Result;
use log::trace;

/// A host that can render a text sample offscreen and report its width.
///
/// Implementations typically insert a hidden element into the render tree. Methods take
/// `&self` so several rulers can be live at once; hosts use interior mutability.
pub trait TextMeasurer {
    /// Handle to one offscreen sample.
    type Handle;

    /// Insert an offscreen sample holding `text`.
    ///
    /// # Errors
    /// Fails if the host cannot create the sample.
    fn acquire(&self, text: &str) -> Result<Self::Handle>;

    /// Apply an ordered `font-family` stack to the sample.
    ///
    /// # Errors
    /// Fails if the sample is gone or the stack is rejected.
    fn set_font_stack(&self, handle: &Self::Handle, families: &[&str]) -> Result<()>;

    /// Rendered width of the sample in whole CSS pixels.
    ///
    /// # Errors
    /// Fails if the sample cannot be measured.
    fn measure_width(&self, handle: &Self::Handle) -> Result<u32>;

    /// Remove the sample from the render tree. The handle is not used afterwards.
    fn release(&self, handle: &Self::Handle);
}

/// An offscreen sample that is released when dropped.
pub struct Ruler<'host, M: TextMeasurer + ?Sized> {
    measurer: &'host M,
    handle: M::Handle,
}

impl<'host, M: TextMeasurer + ?Sized> Ruler<'host, M> {
    /// Acquire a sample for `text`.
    ///
    /// # Errors
    /// Fails if the measurer cannot create the sample.
    pub fn new(measurer: &'host M, text: &str) -> Result<Self> {
        let handle = measurer.acquire(text)?;
        Ok(Self { measurer, handle })
    }

    /// Acquire a sample for `text` rendered with `families`.
    ///
    /// # Errors
    /// Fails if the sample cannot be created or styled; a created sample is released.
    pub fn with_font_stack(measurer: &'host M, text: &str, families: &[&str]) -> Result<Self> {
        let ruler = Self::new(measurer, text)?;
        ruler.set_font_stack(families)?;
        Ok(ruler)
    }

    /// Apply a `font-family` stack.
    ///
    /// # Errors
    /// Fails if the measurer rejects the stack.
    pub fn set_font_stack(&self, families: &[&str]) -> Result<()> {
        trace!("ruler font stack: {}", families.join(", "));
        self.measurer.set_font_stack(&self.handle, families)
    }

    /// Current rendered width.
    ///
    /// # Errors
    /// Fails if the measurer cannot measure the sample.
    pub fn width(&self) -> Result<u32> {
        self.measurer.measure_width(&self.handle)
    }
}

impl<M: TextMeasurer + ?Sized> Drop for Ruler<'_, M> {
    fn drop(&mut self) {
        self.measurer.release(&self.handle);
    }
}
