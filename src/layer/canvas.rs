use tracing::{debug, warn};

use crate::{
    foundation::core::Extent,
    foundation::error::{PixelPaneError, PixelPaneResult},
    layer::layer::Layer,
    render::backend::Presenter,
};

/// Largest number of layers that may be stacked over the base layer.
pub const MAX_EXTRA_LAYERS: usize = 15;

/// An ordered stack of equally sized layers. Layer 0 is the base and is drawn first.
#[derive(Debug)]
pub struct Canvas {
    extent: Extent,
    layers: Vec<Layer>,
}

impl Canvas {
    /// Allocate the base layer plus `extra_layers` blank, clean layers.
    pub fn new(
        presenter: &mut dyn Presenter,
        extent: Extent,
        extra_layers: usize,
    ) -> PixelPaneResult<Self> {
        if extra_layers > MAX_EXTRA_LAYERS {
            return Err(PixelPaneError::unsupported(format!(
                "at most {MAX_EXTRA_LAYERS} extra layers are supported, got {extra_layers}"
            )));
        }
        if extent.is_empty() {
            return Err(PixelPaneError::invalid_dimension(format!(
                "canvas size must be positive, got {}x{}",
                extent.width, extent.height
            )));
        }

        let mut layers = Vec::with_capacity(extra_layers + 1);
        for _ in 0..=extra_layers {
            match Layer::new(presenter, extent.width, extent.height) {
                Ok(layer) => layers.push(layer),
                Err(err) => {
                    for mut layer in layers {
                        if let Err(err) = layer.release(presenter) {
                            warn!(%err, "failed to release layer after partial canvas setup");
                        }
                    }
                    return Err(err);
                }
            }
        }
        debug!(
            width = extent.width,
            height = extent.height,
            layers = layers.len(),
            "canvas created"
        );
        Ok(Self { extent, layers })
    }

    /// Shared layer size.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Shared layer width.
    pub fn width(&self) -> u32 {
        self.extent.width
    }

    /// Shared layer height.
    pub fn height(&self) -> u32 {
        self.extent.height
    }

    /// Base layer plus extra layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer `index`, 0 being the base.
    pub fn layer(&self, index: usize) -> PixelPaneResult<&Layer> {
        let count = self.layers.len();
        self.layers
            .get(index)
            .ok_or(PixelPaneError::InvalidLayerIndex { index, count })
    }

    /// Mutable layer `index`, 0 being the base.
    pub fn layer_mut(&mut self, index: usize) -> PixelPaneResult<&mut Layer> {
        let count = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(PixelPaneError::InvalidLayerIndex { index, count })
    }

    /// All layers, base first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Resize every layer, keeping the overlapping pixels. Every layer ends up dirty.
    ///
    /// All layers are reallocated before any is replaced; on error none of them changes.
    pub fn resize(&mut self, presenter: &mut dyn Presenter, extent: Extent) -> PixelPaneResult<()> {
        if extent.is_empty() {
            return Err(PixelPaneError::invalid_dimension(format!(
                "canvas size must be positive, got {}x{}",
                extent.width, extent.height
            )));
        }
        let mut staged = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            match layer.stage(presenter, extent.width, extent.height, true) {
                Ok(s) => staged.push(s),
                Err(err) => {
                    for s in staged {
                        s.discard(presenter);
                    }
                    return Err(err);
                }
            }
        }
        for (layer, s) in self.layers.iter_mut().zip(staged) {
            layer.apply_staged(presenter, s);
        }
        debug!(width = extent.width, height = extent.height, "canvas resized");
        self.extent = extent;
        Ok(())
    }

    /// Upload every dirty layer.
    pub fn validate_all(&mut self, presenter: &mut dyn Presenter) -> PixelPaneResult<()> {
        self.layers
            .iter_mut()
            .try_for_each(|layer| layer.validate(presenter))
    }

    /// Draw every layer back to front.
    pub fn draw_all(&mut self, presenter: &mut dyn Presenter) -> PixelPaneResult<()> {
        self.layers
            .iter_mut()
            .try_for_each(|layer| layer.draw(presenter))
    }

    /// Free every layer's buffer and texture.
    pub fn release(&mut self, presenter: &mut dyn Presenter) -> PixelPaneResult<()> {
        let mut first_err = None;
        for layer in &mut self.layers {
            if let Err(err) = layer.release(presenter) {
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/canvas.rs"]
mod tests;
