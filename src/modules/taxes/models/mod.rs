mod gst_rates;
mod line_totals;

pub use gst_rates::GstRates;
pub use line_totals::LineTotals;
