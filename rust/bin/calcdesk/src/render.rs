//! Terminal renderer for the profile view store.

use calcdesk_bff::{Alert, AlertKind, AppRoute, CalculationCount, ProfileFormState, ProfileView};
use calcdesk_flux::StateStore;

/// Print alerts and route changes as the controller writes them.
pub fn attach(store: &StateStore) {
    store.subscribe("app/#", |path, value| {
        if let Some(alert) = value.downcast_ref::<Alert>() {
            match alert.kind {
                AlertKind::Success => println!("{}", alert.message),
                AlertKind::Error => eprintln!("error: {}", alert.message),
            }
        } else if let Some(route) = value.downcast_ref::<AppRoute>() {
            tracing::debug!(path, route = %route.0, "navigate");
            eprintln!("Signed out. Run `calcdesk login` to sign in again.");
        }
    });
}

/// Print the profile card from whatever the controller has stored.
pub fn profile(store: &StateStore) {
    let Some(view) = store.get_as::<ProfileView>(ProfileView::PATH) else {
        return;
    };
    let bio = store
        .get_as::<ProfileFormState>(ProfileFormState::PATH)
        .map(|f| f.bio)
        .unwrap_or_default();
    let calculations = store
        .get_as::<CalculationCount>(CalculationCount::PATH)
        .map(|c| c.0.to_string())
        .unwrap_or_else(|| "-".to_string());

    println!("[{}] {}", view.initials, view.username);
    println!("  {:14} {}", "Email:", view.email);
    if !bio.is_empty() {
        println!("  {:14} {}", "Bio:", bio);
    }
    println!("  {:14} {}", "Member since:", view.member_since);
    println!("  {:14} {} days", "Member for:", view.member_days);
    if let Some(updated) = &view.last_updated {
        println!("  {:14} {}", "Last updated:", updated);
    }
    println!("  {:14} {}", "Calculations:", calculations);
    if let Some(count) = &view.update_count {
        println!("  {:14} {}", "Updates:", count);
    }
}
