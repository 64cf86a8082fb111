//! Quote math: pixel area to square metres, and line items to totals.
//!
//! ```text
//! area_m2  = area_px / ppm²
//! subtotal = (material + labor) × area_m2 × (1 + markup% / 100)
//! tax      = Σ subtotal × tax% / 100
//! total    = Σ subtotal + tax
//! ```
//!
//! [`Quote`] recomputes its totals after every add, update and remove so
//! readers never see stale sums.

#[cfg(test)]
#[path = "quote_test.rs"]
mod quote_test;

use serde::{Deserialize, Serialize};

use crate::mask::{Mask, MaskId};

/// Error returned by quote calculations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QuoteError {
    /// Pixels-per-metre must be finite and positive.
    #[error("invalid calibration: {0} pixels per metre")]
    InvalidCalibration(f64),
    /// Areas must be finite and non-negative.
    #[error("invalid area: {0} square metres")]
    InvalidArea(f64),
    /// No line item exists for the mask.
    #[error("no quote item for mask {0}")]
    UnknownItem(MaskId),
}

/// Convert a pixel area to square metres.
///
/// # Errors
///
/// Returns [`QuoteError::InvalidCalibration`] when `pixels_per_meter` is not finite and positive.
pub fn area_m2(area_px: f64, pixels_per_meter: f64) -> Result<f64, QuoteError> {
    check_ppm(pixels_per_meter)?;
    Ok(area_px / (pixels_per_meter * pixels_per_meter))
}

/// Convert a pixel length to metres.
///
/// # Errors
///
/// Returns [`QuoteError::InvalidCalibration`] when `pixels_per_meter` is not finite and positive.
pub fn length_m(length_px: f64, pixels_per_meter: f64) -> Result<f64, QuoteError> {
    check_ppm(pixels_per_meter)?;
    Ok(length_px / pixels_per_meter)
}

fn check_ppm(pixels_per_meter: f64) -> Result<(), QuoteError> {
    if pixels_per_meter.is_finite() && pixels_per_meter > 0.0 {
        Ok(())
    } else {
        Err(QuoteError::InvalidCalibration(pixels_per_meter))
    }
}

/// Per-square-metre pricing for one line.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pricing {
    pub material_cost_per_m2: f64,
    pub labor_cost_per_m2: f64,
    pub markup_percent: f64,
}

impl Pricing {
    /// Subtotal for `area_m2` square metres.
    #[must_use]
    pub fn subtotal(&self, area_m2: f64) -> f64 {
        (self.material_cost_per_m2 + self.labor_cost_per_m2) * area_m2 * (1.0 + self.markup_percent / 100.0)
    }
}

/// One priced mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub mask_id: MaskId,
    pub name: String,
    pub material_id: Option<String>,
    pub pricing: Pricing,
    /// Enclosed area; zero for linear masks.
    pub area_m2: f64,
    /// Perimeter for area masks, run length for linear ones.
    pub length_m: f64,
    pub subtotal: f64,
}

impl QuoteItem {
    /// Price a mask, sampling curved segments at `bezier_steps`.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::InvalidCalibration`] for a bad `pixels_per_meter`.
    pub fn from_mask(mask: &Mask, pixels_per_meter: f64, pricing: Pricing, bezier_steps: usize) -> Result<Self, QuoteError> {
        let area = area_m2(mask.area_px(bezier_steps), pixels_per_meter)?;
        let length = length_m(mask.length_px(bezier_steps), pixels_per_meter)?;
        Ok(Self {
            mask_id: mask.id,
            name: mask.name.clone(),
            material_id: mask.material_id.clone(),
            pricing,
            area_m2: area,
            length_m: length,
            subtotal: pricing.subtotal(area),
        })
    }

    fn reprice(&mut self) {
        self.subtotal = self.pricing.subtotal(self.area_m2);
    }
}

/// A quote: line items plus derived totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Quote {
    items: Vec<QuoteItem>,
    tax_rate: f64,
    subtotal: f64,
    tax_amount: f64,
    total: f64,
}

impl Quote {
    /// Empty quote with `tax_rate` in percent.
    #[must_use]
    pub fn new(tax_rate: f64) -> Self {
        Self { tax_rate, ..Self::default() }
    }

    /// Add an item, replacing any existing item for the same mask.
    pub fn add_item(&mut self, item: QuoteItem) {
        match self.items.iter_mut().find(|i| i.mask_id == item.mask_id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self.recalculate();
    }

    /// Change the pricing of an existing item.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::UnknownItem`] if the mask has no item.
    pub fn update_pricing(&mut self, mask_id: MaskId, pricing: Pricing) -> Result<(), QuoteError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.mask_id == mask_id)
            .ok_or(QuoteError::UnknownItem(mask_id))?;
        item.pricing = pricing;
        item.reprice();
        self.recalculate();
        Ok(())
    }

    /// Replace the measured area of an existing item (after the mask was edited).
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::InvalidArea`] for a negative or non-finite area
    /// and [`QuoteError::UnknownItem`] if the mask has no item.
    pub fn update_area(&mut self, mask_id: MaskId, area_m2: f64) -> Result<(), QuoteError> {
        if !(area_m2.is_finite() && area_m2 >= 0.0) {
            return Err(QuoteError::InvalidArea(area_m2));
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.mask_id == mask_id)
            .ok_or(QuoteError::UnknownItem(mask_id))?;
        item.area_m2 = area_m2;
        item.reprice();
        self.recalculate();
        Ok(())
    }

    /// Remove the item for a mask, returning it.
    pub fn remove_item(&mut self, mask_id: MaskId) -> Option<QuoteItem> {
        let pos = self.items.iter().position(|i| i.mask_id == mask_id)?;
        let item = self.items.remove(pos);
        self.recalculate();
        Some(item)
    }

    /// Set the tax rate in percent.
    pub fn set_tax_rate(&mut self, tax_rate: f64) {
        self.tax_rate = tax_rate;
        self.recalculate();
    }

    fn recalculate(&mut self) {
        self.subtotal = self.items.iter().map(|i| i.subtotal).sum();
        self.tax_amount = self.subtotal * self.tax_rate / 100.0;
        self.total = self.subtotal + self.tax_amount;
    }

    #[must_use]
    pub fn items(&self) -> &[QuoteItem] {
        &self.items
    }

    #[must_use]
    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.subtotal
    }

    #[must_use]
    pub fn tax_amount(&self) -> f64 {
        self.tax_amount
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }
}
