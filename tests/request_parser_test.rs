//! Request header and per-API body decoding.

mod common;

use common::{describe_topics_body, fetch_body, request_bytes};
use swiftqueue::protocol::{parse_describe_topic_partitions, parse_fetch, parse_header};
use swiftqueue::SwiftQueueError;

#[test]
fn parses_header_fields_and_body() {
    let raw = request_bytes(18, 4, 7, Some("kafka-cli"), &[0xaa, 0xbb]);
    let header = parse_header(&raw).unwrap();
    assert_eq!(header.message_size as usize, raw.len() - 4);
    assert_eq!(header.api_key, 18);
    assert_eq!(header.api_version, 4);
    assert_eq!(header.correlation_id, 7);
    assert_eq!(header.client_id.as_deref(), Some("kafka-cli"));
    assert_eq!(header.body.as_ref(), &[0xaa, 0xbb][..]);
    assert_eq!(header.header_len(), 4 + 2 + 2 + 4 + 2 + 9 + 1);
}

#[test]
fn absent_client_id_is_none() {
    let raw = request_bytes(18, 0, 1, None, &[]);
    let header = parse_header(&raw).unwrap();
    assert_eq!(header.client_id, None);
    assert!(header.body.is_empty());
    assert_eq!(header.header_len(), 15);

    let mut zero_len = request_bytes(18, 0, 1, Some(""), &[]);
    assert_eq!(&zero_len[12..14], &[0, 0]);
    assert_eq!(parse_header(&zero_len).unwrap().client_id, None);
    zero_len.truncate(zero_len.len() - 1);
    zero_len[3] -= 1;
    assert!(matches!(
        parse_header(&zero_len),
        Err(SwiftQueueError::Truncated(_))
    ));
}

#[test]
fn fewer_than_four_bytes_is_truncated() {
    assert!(matches!(
        parse_header(&[0, 0, 1]),
        Err(SwiftQueueError::Truncated(_))
    ));
}

#[test]
fn declared_size_beyond_buffer_is_truncated() {
    let mut raw = request_bytes(18, 4, 7, None, &[]);
    raw.pop();
    assert!(matches!(parse_header(&raw), Err(SwiftQueueError::Truncated(_))));
}

#[test]
fn negative_size_is_malformed() {
    assert!(matches!(
        parse_header(&[0xff, 0xff, 0xff, 0xff, 0, 0]),
        Err(SwiftQueueError::Malformed(_))
    ));
}

#[test]
fn body_stops_at_declared_frame_end() {
    let mut raw = request_bytes(18, 4, 7, None, &[1, 2]);
    raw.extend_from_slice(&[9, 9, 9]);
    let header = parse_header(&raw).unwrap();
    assert_eq!(header.body.as_ref(), &[1, 2][..]);
}

#[test]
fn topic_array_length_one_yields_no_topics() {
    let raw = request_bytes(75, 0, 3, Some("c"), &describe_topics_body(&[]));
    let header = parse_header(&raw).unwrap();
    let req = parse_describe_topic_partitions(header, &raw).unwrap();
    assert_eq!(req.topic_array_length, 1);
    assert!(req.topics.is_empty());
}

#[test]
fn topic_array_length_two_yields_one_topic() {
    let raw = request_bytes(75, 0, 3, Some("client-1"), &describe_topics_body(&["foo"]));
    let header = parse_header(&raw).unwrap();
    let req = parse_describe_topic_partitions(header, &raw).unwrap();
    assert_eq!(req.topic_array_length, 2);
    assert_eq!(req.topics.len(), 1);
    assert_eq!(&req.topics[0].topic_name[..], b"foo");
    assert_eq!(req.topics[0].topic_name_length, 4);
    assert_eq!(req.header.correlation_id, 3);
}

#[test]
fn parses_several_topics_in_request_order() {
    let raw = request_bytes(75, 0, 3, None, &describe_topics_body(&["b", "a", "cc"]));
    let header = parse_header(&raw).unwrap();
    let req = parse_describe_topic_partitions(header, &raw).unwrap();
    let names: Vec<Vec<u8>> = req.topics.iter().map(|t| t.topic_name.to_vec()).collect();
    assert_eq!(names, vec![b"b".to_vec(), b"a".to_vec(), b"cc".to_vec()]);
}

#[test]
fn topic_list_shorter_than_declared_is_truncated() {
    let mut body = describe_topics_body(&["foo"]);
    body[0] = 3; // claims two topics
    body.truncate(1 + 1 + 3 + 1);
    let raw = request_bytes(75, 0, 3, None, &body);
    let header = parse_header(&raw).unwrap();
    assert!(matches!(
        parse_describe_topic_partitions(header, &raw),
        Err(SwiftQueueError::Truncated(_))
    ));
}

#[test]
fn parses_fetch_fixed_fields() {
    let raw = request_bytes(1, 16, 11, None, &fetch_body(42));
    let header = parse_header(&raw).unwrap();
    let fetch = parse_fetch(&header.body).unwrap();
    assert_eq!(fetch.max_wait_ms, 500);
    assert_eq!(fetch.min_bytes, 1);
    assert_eq!(fetch.max_bytes, 52_428_800);
    assert_eq!(fetch.isolation_level, 0);
    assert_eq!(fetch.session_id, 42);
    assert_eq!(fetch.session_epoch, 0);
}

#[test]
fn short_fetch_body_is_truncated() {
    assert!(matches!(
        parse_fetch(&[0u8; 20]),
        Err(SwiftQueueError::Truncated(_))
    ));
    assert!(parse_fetch(&[0u8; 21]).is_ok());
}

#[test]
fn client_id_bytes_need_not_be_utf8() {
    let mut raw = request_bytes(18, 4, 7, Some("ab"), &[0xaa]);
    raw[14] = 0xff;
    let header = parse_header(&raw).unwrap();
    assert_eq!(header.client_id_length, 2);
    assert_eq!(header.client_id.as_deref(), Some("\u{fffd}b"));
    assert_eq!(header.header_len(), 15 + 2);
    assert_eq!(header.body.as_ref(), &[0xaa][..]);
}

#[test]
fn topic_name_bytes_are_kept_verbatim() {
    let mut raw = request_bytes(75, 0, 3, None, &describe_topics_body(&["fo"]));
    // header (15 bytes), array length, name length, then the name
    raw[17] = 0xff;
    let header = parse_header(&raw).unwrap();
    let req = parse_describe_topic_partitions(header, &raw).unwrap();
    assert_eq!(req.topics.len(), 1);
    assert_eq!(&req.topics[0].topic_name[..], &[0xff, b'o'][..]);
    assert_eq!(req.topics[0].topic_name_length, 3);
}
