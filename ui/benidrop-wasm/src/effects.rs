//! Side-effect slots the controller calls but does not implement itself.
//!
//! Both default to no-ops; the browser build can swap in real
//! implementations without touching the controller.

/// Celebration shown after a reward was granted (check-in, task).
pub trait RewardEffect {
    fn celebrate(&self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEffect;

impl RewardEffect for NoopEffect {
    fn celebrate(&self) {}
}

/// Preset donation amounts, in EGLD. The markup carries one
/// `donate-{label}` control per preset.
pub const DONATION_PRESETS: [DonationAmount; 4] = [
    DonationAmount { label: "0.1", egld: 0.1 },
    DonationAmount { label: "0.5", egld: 0.5 },
    DonationAmount { label: "1", egld: 1.0 },
    DonationAmount { label: "5", egld: 5.0 },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonationAmount {
    pub label: &'static str,
    pub egld: f64,
}

impl DonationAmount {
    pub fn element_id(&self) -> String {
        format!("donate-{}", self.label)
    }
}

pub trait DonationHandler {
    fn donate(&self, amount: DonationAmount);
}

/// Records the intent only; the payment flow lives outside this app.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDonations;

impl DonationHandler for LoggingDonations {
    fn donate(&self, amount: DonationAmount) {
        tracing::info!(egld = amount.egld, "donation requested");
    }
}
