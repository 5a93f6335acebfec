use tracing::{event, Level};

use crate::{consts::IMAGE_EVENT_TOPICS, RegistryUrl};

/// Returns the filters that scope containerd image queries to the mirrored registries,
///
/// The first filter is for listing images, the second is for subscribing to image events. Hosts are
/// joined in the order given, an empty list produces an empty alternation. Only validated registries are
/// accepted, so every host is a plain `host[:port]`.
///
pub fn create_filters(registries: &[RegistryUrl]) -> (String, String) {
    let hosts = registries
        .iter()
        .map(|r| r.host())
        .collect::<Vec<_>>()
        .join("|");

    let list_filter = format!(r#"name~="{hosts}""#);
    let event_filter = format!(r#"topic~="{IMAGE_EVENT_TOPICS}",event.name~="{hosts}""#);

    event!(
        Level::TRACE,
        "Created filters, list: {list_filter}, event: {event_filter}"
    );
    (list_filter, event_filter)
}
