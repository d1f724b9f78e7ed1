/// Request to swap a native denomination on the ANC/UST pair.
///
/// `amount` is in display units (e.g. `"10.5"` UST) as entered by the user;
/// it is validated and converted to micro-units by the fabricator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapIntent {
    pub address: String,
    pub amount: String,
    pub denom: String,
    pub to: Option<String>,
    pub belief_price: Option<String>,
    pub max_spread: Option<String>,
}

/// Request to bond native tokens to the bAsset hub and mint the bAsset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BondIntent {
    pub address: String,
    pub amount: String,
    pub validator: String,
}

/// Request to whitelist a validator on the bAsset hub.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterValidatorIntent {
    pub address: String,
    pub validator: String,
}

impl SwapIntent {
    pub fn new(
        address: impl Into<String>,
        amount: impl Into<String>,
        denom: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            amount: amount.into(),
            denom: denom.into(),
            to: None,
            belief_price: None,
            max_spread: None,
        }
    }

    /// Sends the swapped asset to `to` instead of the sender.
    pub fn with_recipient(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn with_belief_price(mut self, belief_price: impl Into<String>) -> Self {
        self.belief_price = Some(belief_price.into());
        self
    }

    pub fn with_max_spread(mut self, max_spread: impl Into<String>) -> Self {
        self.max_spread = Some(max_spread.into());
        self
    }
}

impl BondIntent {
    pub fn new(
        address: impl Into<String>,
        amount: impl Into<String>,
        validator: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            amount: amount.into(),
            validator: validator.into(),
        }
    }
}

impl RegisterValidatorIntent {
    pub fn new(address: impl Into<String>, validator: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            validator: validator.into(),
        }
    }
}
