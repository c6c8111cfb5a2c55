use sidebar_logging::{sidebar_debug, sidebar_warn};

use crate::RequestId;

/// Order parameters as the user entered them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutoTradeOrder {
    pub market_slug: String,
    pub x_handles: Vec<String>,
    pub condition: String,
    pub amount: f64,
    pub limit: f64,
}

impl AutoTradeOrder {
    /// Trims text fields and drops blank handles, or explains why the order
    /// cannot be placed.
    pub fn normalized(self) -> Result<Self, String> {
        let market_slug = self.market_slug.trim().to_string();
        let condition = self.condition.trim().to_string();
        if market_slug.is_empty() {
            return Err("market slug is blank".to_string());
        }
        if condition.is_empty() {
            return Err("condition is blank".to_string());
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(format!("amount {} must be positive", self.amount));
        }
        if !self.limit.is_finite() || self.limit <= 0.0 || self.limit > 1.0 {
            return Err(format!("limit {} must be in (0, 1]", self.limit));
        }
        let x_handles = self
            .x_handles
            .iter()
            .map(|handle| handle.trim())
            .filter(|handle| !handle.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(Self {
            market_slug,
            x_handles,
            condition,
            amount: self.amount,
            limit: self.limit,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AutoTradePhase {
    #[default]
    Idle,
    Submitting,
    Accepted,
    Rejected(String),
}

/// Last autotrade order and whether the backend took it.
///
/// Nothing about autotrade arrives on the socket, so the launch outcome is
/// the whole lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutoTradeTracker {
    phase: AutoTradePhase,
    order: Option<AutoTradeOrder>,
    request: RequestId,
}

impl AutoTradeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &AutoTradePhase {
        &self.phase
    }

    pub fn order(&self) -> Option<&AutoTradeOrder> {
        self.order.as_ref()
    }

    pub fn request_id(&self) -> RequestId {
        self.request
    }

    pub fn begin_request(&mut self, order: AutoTradeOrder) -> RequestId {
        if self.phase == AutoTradePhase::Submitting {
            sidebar_debug!("autotrade: order {} superseded", self.request);
        }
        self.request += 1;
        self.order = Some(order);
        self.phase = AutoTradePhase::Submitting;
        self.request
    }

    pub fn accepted(&mut self, request: RequestId) -> bool {
        if request != self.request || self.phase != AutoTradePhase::Submitting {
            return false;
        }
        self.phase = AutoTradePhase::Accepted;
        true
    }

    pub fn failed(&mut self, request: RequestId, message: &str) -> bool {
        if request != self.request {
            return false;
        }
        sidebar_warn!("autotrade: order {} rejected: {}", request, message);
        self.phase = AutoTradePhase::Rejected(message.to_string());
        true
    }

    pub fn reset(&mut self) {
        let request = self.request + 1;
        *self = Self {
            request,
            ..Self::default()
        };
    }
}
