use std::cmp::Reverse;

use crate::models::{BadgeView, EarnedBadge};

/// Newest badge first. Ties keep their stored order.
pub fn order_badges(mut badges: Vec<EarnedBadge>) -> Vec<EarnedBadge> {
    badges.sort_by_key(|badge| Reverse(badge.sort_timestamp()));
    badges
}

pub fn badge_shelf(badges: Vec<EarnedBadge>) -> Vec<BadgeView> {
    order_badges(badges).into_iter().map(BadgeView::from).collect()
}
