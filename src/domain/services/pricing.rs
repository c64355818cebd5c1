use crate::domain::models::service::Service;
use std::collections::BTreeSet;

/// Base price plus every add-on of `service` whose name is selected.
/// Selected names the service no longer offers add nothing. `None` on overflow.
pub fn checked_total_price(service: Option<&Service>, selected: &BTreeSet<String>) -> Option<i64> {
    let Some(service) = service else {
        return Some(0);
    };

    service
        .add_ons
        .iter()
        .filter(|add_on| selected.contains(&add_on.name))
        .try_fold(service.base_price, |total, add_on| total.checked_add(add_on.price))
}

/// Display total for a draft; saturates instead of overflowing.
pub fn total_price(service: Option<&Service>, selected: &BTreeSet<String>) -> i64 {
    checked_total_price(service, selected).unwrap_or(i64::MAX)
}
