use strum::{Display, EnumString};

use crate::events::EventName;

/// Client-side cache buckets. Kebab-case names match the query keys the
/// front-end caches under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum CacheKey {
    PendingOrders,
    Orders,
    Stats,
    Allocations,
    PartnerOrders,
    Deposits,
    MemberBalance,
    DepositHistory,
}

/// Static event-name to cache-key mapping. Order-lifecycle events
/// invalidate the pending-orders, orders and stats caches together
/// because all three are derived from the same rows. Lifecycle events
/// (`connected`, `heartbeat`) invalidate nothing.
pub fn invalidation_keys(event: EventName) -> &'static [CacheKey] {
    use CacheKey::*;
    match event {
        EventName::OrderCreated
        | EventName::OrderUpdated
        | EventName::OrdersDeleted
        | EventName::OrderAdjusted => &[PendingOrders, Orders, Stats],
        EventName::AllocationUpdated => &[Allocations, PartnerOrders],
        EventName::PartnerOrdersUpdated => &[PartnerOrders],
        EventName::PendingOrdersUpdated => &[PendingOrders],
        EventName::DepositsUpdated => &[Deposits, Stats],
        EventName::MemberBalanceUpdated => &[MemberBalance, DepositHistory],
        EventName::Connected | EventName::Heartbeat => &[],
    }
}
