//! Price aggregations over records already filtered by the store.
//!
//! Every "latest" selection here orders observations by `(recorded_at, id)`, so two
//! records stamped with the same instant resolve to the one with the higher id.
//! Ids are UUID v7, which makes that the later insert.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use cardvault_domain::card::{Condition, Currency};

use crate::domain::types::{OwnedCard, PriceRecord};

/// Length of the "current" bucket, ending now.
pub const CURRENT_WINDOW_DAYS: i64 = 7;
/// Total lookback of the gainers comparison; the "previous" bucket is the older half.
pub const COMPARISON_WINDOW_DAYS: i64 = 14;

/// Identifies one price series.
pub type PriceKey = (Uuid, Condition);

fn is_newer(candidate: &PriceRecord, held: &PriceRecord) -> bool {
    (candidate.recorded_at, candidate.id) > (held.recorded_at, held.id)
}

/// Most recent record per condition for a single card's records.
pub fn latest_by_condition(records: &[PriceRecord]) -> BTreeMap<Condition, &PriceRecord> {
    let mut latest: BTreeMap<Condition, &PriceRecord> = BTreeMap::new();
    for record in records {
        let held = latest.entry(record.condition).or_insert(record);
        if is_newer(record, held) {
            *held = record;
        }
    }
    latest
}

/// Most recent record per (card, condition) across any number of cards.
pub fn latest_by_key(records: &[PriceRecord]) -> HashMap<PriceKey, &PriceRecord> {
    let mut latest: HashMap<PriceKey, &PriceRecord> = HashMap::new();
    for record in records {
        let held = latest
            .entry((record.card_id, record.condition))
            .or_insert(record);
        if is_newer(record, held) {
            *held = record;
        }
    }
    latest
}

/// Price movement of one series between the previous and the current bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    pub card_id: Uuid,
    pub condition: Condition,
    pub currency: Currency,
    pub current_price: Decimal,
    pub previous_price: Decimal,
    pub change: Decimal,
    /// Percentage of `previous_price`, rounded to two decimal places.
    pub change_percent: Decimal,
    /// When the current observation was recorded.
    pub recorded_at: DateTime<Utc>,
}

fn price_change(current: &PriceRecord, previous: &PriceRecord) -> Option<PriceChange> {
    let change = current.price - previous.price;
    // None when previous is zero: no meaningful percentage exists.
    let change_percent = change
        .checked_div(previous.price)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .round_dp(2);
    Some(PriceChange {
        card_id: current.card_id,
        condition: current.condition,
        currency: current.currency,
        current_price: current.price,
        previous_price: previous.price,
        change,
        change_percent,
        recorded_at: current.recorded_at,
    })
}

/// Rank series by relative price increase.
///
/// Current is the latest record in `[now - 7d, now]`, previous the latest in
/// `[now - 14d, now - 7d)`. Records outside `[now - 14d, now]` are ignored. Series
/// missing either bucket, or whose previous price is zero, are dropped. Sorted by
/// `change_percent` descending, then `change` descending, then key, and cut to `limit`.
pub fn rank_gainers(records: &[PriceRecord], now: DateTime<Utc>, limit: usize) -> Vec<PriceChange> {
    let current_from = now - Duration::days(CURRENT_WINDOW_DAYS);
    let previous_from = now - Duration::days(COMPARISON_WINDOW_DAYS);

    let mut buckets: HashMap<PriceKey, (Option<&PriceRecord>, Option<&PriceRecord>)> =
        HashMap::new();
    for record in records {
        let at = record.recorded_at;
        if at > now || at < previous_from {
            continue;
        }
        let (current, previous) = buckets
            .entry((record.card_id, record.condition))
            .or_default();
        let held = if at >= current_from { current } else { previous };
        if held.is_none_or(|h| is_newer(record, h)) {
            *held = Some(record);
        }
    }

    let mut changes: Vec<PriceChange> = buckets
        .into_values()
        .filter_map(|(current, previous)| price_change(current?, previous?))
        .collect();
    changes.sort_by(|a, b| {
        b.change_percent
            .cmp(&a.change_percent)
            .then_with(|| b.change.cmp(&a.change))
            .then_with(|| a.card_id.cmp(&b.card_id))
            .then_with(|| a.condition.cmp(&b.condition))
    });
    changes.truncate(limit);
    changes
}

/// The most valuable entry of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct RarestCard {
    pub card_id: Uuid,
    pub label: String,
    pub price: Decimal,
}

/// Aggregate statistics for one user's collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSummary {
    /// Number of entries, regardless of quantity held.
    pub total_cards: usize,
    /// Sum of quantities across entries.
    pub total_quantity: i64,
    /// Σ latest price × quantity over entries that have a price.
    pub total_value: Decimal,
    /// `None` when no entry has a price.
    pub rarest_card: Option<RarestCard>,
}

/// Value a collection against the latest price of each (card, condition).
///
/// Entries without any price contribute nothing. The rarest card is the entry with
/// the highest latest price; on ties the first one in `owned` order wins.
pub fn summarize_collection(owned: &[OwnedCard], prices: &[PriceRecord]) -> CollectionSummary {
    let latest = latest_by_key(prices);

    let mut total_value = Decimal::ZERO;
    let mut rarest: Option<(&OwnedCard, Decimal)> = None;
    for item in owned {
        let Some(record) = latest.get(&(item.entry.card_id, item.entry.condition)) else {
            continue;
        };
        total_value += record.price * Decimal::from(item.entry.quantity);
        if rarest.is_none_or(|(_, best)| record.price > best) {
            rarest = Some((item, record.price));
        }
    }

    CollectionSummary {
        total_cards: owned.len(),
        total_quantity: owned.iter().map(|item| i64::from(item.entry.quantity)).sum(),
        total_value,
        rarest_card: rarest.map(|(item, price)| RarestCard {
            card_id: item.card.id,
            label: item.card.label(),
            price,
        }),
    }
}
