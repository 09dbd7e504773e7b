use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use super::config::SessionConfig;
use super::record::ObjectRecord;
use super::slice::{SliceOutput, SliceSession};
use crate::canvas::{ContainerBoundary, InteriorBounds};
use crate::error::Result;
use crate::math::CellRect;
use crate::operations::rasterize::Rasterize;
use crate::raster::{Grid, Label};
use crate::shape::{validate_labels, ObjectInstance, ShapeDescriptor};

/// Packs the same set of objects into a stack of independent slices.
pub struct PackVolume {
    config: SessionConfig,
    boundary: ContainerBoundary,
    templates: Vec<ObjectInstance>,
}

impl PackVolume {
    /// Validates the inputs and rasterizes one template per descriptor.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid configuration or label set, and
    /// `RasterError` if a descriptor cannot be rasterized.
    pub fn new(
        config: SessionConfig,
        boundary: ContainerBoundary,
        descriptors: Vec<ShapeDescriptor>,
    ) -> Result<Self> {
        config.validate()?;
        validate_labels(&descriptors, boundary.wall_label())?;
        let rasterize = Rasterize::new().with_custom_min_pixels(config.custom_min_pixels);
        let templates = descriptors
            .into_iter()
            .map(|d| rasterize.execute(Arc::new(d)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            config,
            boundary,
            templates,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn boundary(&self) -> &ContainerBoundary {
        &self.boundary
    }

    /// Rasterized templates, in descriptor order.
    #[must_use]
    pub fn templates(&self) -> &[ObjectInstance] {
        &self.templates
    }

    /// Runs every slice.
    ///
    /// # Errors
    ///
    /// Returns the first slice error in slice order.
    #[tracing::instrument(skip_all, fields(slices = self.config.slices, objects = self.templates.len()))]
    pub fn execute(&self) -> Result<PackedVolume> {
        #[cfg(feature = "parallel")]
        let slices = (0..self.config.slices)
            .into_par_iter()
            .map(|index| self.slice(index))
            .collect::<Result<Vec<_>>>()?;

        #[cfg(not(feature = "parallel"))]
        let slices = (0..self.config.slices)
            .map(|index| self.slice(index))
            .collect::<Result<Vec<_>>>()?;

        info!(slices = slices.len(), "volume packed");
        Ok(PackedVolume {
            interior: self.boundary.interior(),
            slices,
        })
    }

    fn slice(&self, index: usize) -> Result<SliceOutput> {
        SliceSession::new(index, &self.config, &self.boundary, &self.templates).execute()
    }
}

/// Output of [`PackVolume::execute`].
#[derive(Debug, Clone, PartialEq)]
pub struct PackedVolume {
    slices: Vec<SliceOutput>,
    interior: InteriorBounds,
}

impl PackedVolume {
    #[must_use]
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    #[must_use]
    pub fn slices(&self) -> &[SliceOutput] {
        &self.slices
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SliceOutput> {
        self.slices.get(index)
    }

    #[must_use]
    pub fn labels(&self, index: usize) -> Option<&Grid<Label>> {
        self.get(index).map(|s| &s.labels)
    }

    #[must_use]
    pub fn records(&self, index: usize) -> Option<&[ObjectRecord]> {
        self.get(index).map(|s| s.records.as_slice())
    }

    /// Slice `index` cropped to the container interior.
    #[must_use]
    pub fn interior(&self, index: usize) -> Option<Grid<Label>> {
        let labels = self.labels(index)?;
        let rect = CellRect {
            row_min: usize::try_from(self.interior.top).ok()?,
            row_max: usize::try_from(self.interior.floor - 1).ok()?,
            col_min: usize::try_from(self.interior.left).ok()?,
            col_max: usize::try_from(self.interior.right - 1).ok()?,
        };
        Some(labels.crop(rect))
    }
}
