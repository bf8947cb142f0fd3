use opentelemetry_proto::tonic::trace::v1::span::Link;

use super::hex_id;
use crate::attributes::semconv;
use crate::attrs::get_bool;

fn is_child(link: &Link) -> bool {
    get_bool(&link.attributes, semconv::LINK_IS_CHILD) == Some(true)
        || get_bool(&link.attributes, semconv::LINK_ELASTIC_IS_CHILD) == Some(true)
}

/// Removes links marking an inferred child span and returns the hex encoded
/// ids of those children, in link order. The remaining links keep their order.
pub(crate) fn take_children(links: &mut Vec<Link>) -> Vec<String> {
    let (children, visible): (Vec<Link>, Vec<Link>) =
        std::mem::take(links).into_iter().partition(is_child);
    *links = visible;
    children.iter().map(|link| hex_id(&link.span_id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs::tests::bool_kv;
    use opentelemetry_proto::tonic::common::v1::KeyValue;

    fn link(id: u8, attributes: Vec<KeyValue>) -> Link {
        Link {
            span_id: vec![id, 0, 0, 0, 0, 0, 0, 0],
            attributes,
            ..Default::default()
        }
    }

    #[test]
    fn child_links_are_removed() {
        let mut links = vec![
            link(2, vec![]),
            link(3, vec![bool_kv("is_child", true)]),
            link(4, vec![bool_kv("elastic.is_child", true)]),
            link(5, vec![bool_kv("is_child", false)]),
        ];

        let children = take_children(&mut links);

        assert_eq!(children, vec!["0300000000000000", "0400000000000000"]);
        assert_eq!(links, vec![link(2, vec![]), link(5, vec![bool_kv("is_child", false)])]);
    }

    #[test]
    fn no_child_links() {
        let mut links = vec![link(2, vec![])];
        assert!(take_children(&mut links).is_empty());
        assert_eq!(links.len(), 1);
    }
}
