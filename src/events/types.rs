use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::models::dtos::EventStreamParams;
use crate::models::enums::ClientRole;

/// Named server-sent events. The wire name is the kebab-case form
/// (`order-created`, `member-balance-updated`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EventName {
    Connected,
    Heartbeat,
    OrderCreated,
    OrderUpdated,
    OrdersDeleted,
    OrderAdjusted,
    AllocationUpdated,
    PartnerOrdersUpdated,
    PendingOrdersUpdated,
    DepositsUpdated,
    MemberBalanceUpdated,
}

/// One event as queued to a subscriber: name plus the payload already
/// serialized to JSON, so fan-out clones a string instead of
/// re-serializing per client.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub event: EventName,
    pub payload: String,
}

/// Who a stream subscriber is, as asserted by the reverse proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIdentity {
    pub role: ClientRole,
    pub user_id: Option<i32>,
    pub vendor_id: Option<i32>,
}

impl From<&EventStreamParams> for ClientIdentity {
    fn from(params: &EventStreamParams) -> Self {
        Self {
            role: params.role,
            user_id: params.user_id,
            vendor_id: params.vendor_id,
        }
    }
}
