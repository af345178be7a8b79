use crate::core::{bookings, grid, hours};
use crate::domain::model::{AvailabilityResult, HoursWindow, SlotView};
use crate::domain::ports::{AvailabilityService, BookingSource, HoursSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// The availability assembler. Drives the hours resolver, grid builder and
/// booking aggregator in data-dependency order and merges their output into
/// the display payload.
pub struct AvailabilityEngine<H: HoursSource, B: BookingSource> {
    hours_source: H,
    booking_source: B,
    tz: Tz,
    fallback: HoursWindow,
}

impl<H: HoursSource, B: BookingSource> AvailabilityEngine<H, B> {
    pub fn new(hours_source: H, booking_source: B, tz: Tz, fallback: HoursWindow) -> Self {
        Self {
            hours_source,
            booking_source,
            tz,
            fallback,
        }
    }

    /// Compute availability as of an explicit clock reading. Split out from
    /// [`AvailabilityService::today_availability`] so tests control "now".
    pub async fn availability_at(&self, now: DateTime<Tz>) -> Result<AvailabilityResult> {
        let date = now.date_naive();

        let resolved = hours::resolve(&self.hours_source, date, self.tz, &self.fallback).await;
        let grid = grid::build_grid(date, &resolved.window, self.tz)?;
        let occupancy =
            bookings::occupied_keys(&self.booking_source, date, grid.rolls_over, self.tz).await?;

        tracing::debug!(
            "Assembled {} slots ({:?} hours), {} occupied keys",
            grid.slots.len(),
            resolved.origin,
            occupancy.len()
        );

        // A slot stays visible until its period has fully elapsed. When
        // nothing remains (before opening, after closing) the full day is
        // shown instead of an empty board.
        let mut remaining: Vec<_> = grid.slots.iter().filter(|slot| slot.end > now).collect();
        if remaining.is_empty() {
            remaining = grid.slots.iter().collect();
        }

        let views = remaining
            .into_iter()
            .map(|slot| SlotView {
                label: slot.label.clone(),
                booked: occupancy.contains(&slot.key()),
            })
            .collect();

        Ok(AvailabilityResult {
            date_display: now.format("%A, %B %-d, %Y").to_string(),
            grid: views,
        })
    }
}

#[async_trait]
impl<H: HoursSource, B: BookingSource> AvailabilityService for AvailabilityEngine<H, B> {
    async fn today_availability(&self) -> Result<AvailabilityResult> {
        let now = Utc::now().with_timezone(&self.tz);
        self.availability_at(now).await
    }
}
