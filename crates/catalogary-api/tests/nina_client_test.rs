// Integration tests for `NinaClient` and the composite warning join.
#![allow(clippy::unwrap_used)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalogary_api::nina::{WarningDetail, WarningGeo, WarningSummary};
use catalogary_api::{ClientConfig, CompositeWarning, Error, NinaClient, Selection, WarningSource};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, NinaClient) {
    let server = MockServer::start().await;
    let client =
        NinaClient::with_client(reqwest::Client::new(), ClientConfig::new(server.uri())).unwrap();
    (server, client)
}

fn summary(id: &str) -> Value {
    json!({
        "id": id,
        "version": 3,
        "startDate": "2026-10-16T08:00:00+02:00",
        "severity": "Minor",
        "type": "Alert",
        "i18nTitle": {"de": format!("Warnung {id}")},
        "transKeys": {"event": "BBK-EVC-001"}
    })
}

fn detail(id: &str) -> Value {
    json!({
        "identifier": format!("cap.{id}"),
        "sender": "opendata@dwd.de",
        "sent": "2026-10-16T08:00:00+02:00",
        "status": "Actual",
        "msgType": "Alert",
        "scope": "Public",
        "code": ["id:1"],
        "info": [{"language": "de-DE", "event": "STURMBÖEN"}]
    })
}

fn geo() -> Value {
    json!({"type": "FeatureCollection", "features": [{"type": "Feature", "geometry": null}]})
}

async fn mount_warning(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api31/warnings/{id}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail(id)))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api31/warnings/{id}.geojson")))
        .respond_with(ResponseTemplate::new(200).set_body_json(geo()))
        .expect(1)
        .mount(server)
        .await;
}

// ── Endpoints ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_provider_feed_paths() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/api31/(mowas|katwarn|dwd|biwapp|police|lhp)/mapData\.json$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([summary("a")])))
        .expect(6)
        .mount(&server)
        .await;

    let feeds = [
        client.mowas_warnings(None).await,
        client.katwarn_warnings(None).await,
        client.dwd_warnings(None).await,
        client.biwapp_warnings(None).await,
        client.police_warnings(None).await,
        client.lhp_warnings(None).await,
    ];
    for resp in feeds {
        let items: Vec<WarningSummary> = resp.unwrap().parse().unwrap();
        assert_eq!(items[0].id, "a");
    }
}

#[tokio::test]
async fn test_expand_is_sent_only_when_given() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api31/dwd/mapData.json"))
        .and(query_param("expand", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.warnings(WarningSource::Dwd, Some("all")).await.unwrap();
    assert_eq!(resp.url.query(), Some("expand=all"));
    assert_eq!(
        client
            .rest()
            .url_for(&catalogary_api::Request::get("api31/dwd/mapData.json")),
        format!("{}/api31/dwd/mapData.json", server.uri())
    );
}

#[tokio::test]
async fn test_detail_and_geo_match_contracts() {
    let (server, client) = setup().await;
    mount_warning(&server, "mow.1").await;

    let detail: WarningDetail = client
        .warning_detail("mow.1", None)
        .await
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(detail.identifier, "cap.mow.1");

    let geo: WarningGeo = client
        .warning_geo("mow.1", None)
        .await
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(geo.kind, "FeatureCollection");
}

// ── Composite join ──────────────────────────────────────────────────

#[tokio::test]
async fn test_generic_complete_issues_two_calls_per_summary() {
    let (server, client) = setup().await;
    let ids = ["w3", "w1", "w2"];
    for id in ids {
        mount_warning(&server, id).await;
    }

    let warnings: Vec<Value> = ids.iter().map(|id| summary(id)).collect();
    let records = client.generic_complete(&warnings, None).await.unwrap();

    assert_eq!(records.len(), 3);
    let order: Vec<&str> = records
        .iter()
        .map(|r| r.warning["id"].as_str().unwrap())
        .collect();
    assert_eq!(order, ids);
    assert_eq!(records[0].warning_detail["identifier"], "cap.w3");
    assert_eq!(records[2].warning_geo, geo());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 6);
}

#[tokio::test]
async fn test_generic_complete_keeps_duplicates() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/api31/warnings/dup\.(json|geojson)$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"identifier": "cap.dup"})))
        .expect(4)
        .mount(&server)
        .await;

    let warnings = vec![summary("dup"), summary("dup")];
    let records = client.generic_complete(&warnings, None).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], records[1]);
}

#[tokio::test]
async fn test_selection_projects_each_part() {
    let (server, client) = setup().await;
    mount_warning(&server, "sel").await;

    let selection = Selection::new(["id", "severity", "sender", "features", "nonexistent"]);
    let records = client
        .generic_complete(&[summary("sel")], Some(&selection))
        .await
        .unwrap();

    let record = &records[0];
    assert_eq!(record.warning, json!({"id": "sel", "severity": "Minor"}));
    assert_eq!(record.warning_detail, json!({"sender": "opendata@dwd.de"}));
    assert_eq!(
        record.warning_geo,
        json!({"features": [{"type": "Feature", "geometry": null}]})
    );

    let round: CompositeWarning =
        serde_json::from_value(serde_json::to_value(record).unwrap()).unwrap();
    assert_eq!(&round, record);
}

#[tokio::test]
async fn test_selection_with_empty_geo_document() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api31/warnings/g.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail("g")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api31/warnings/g.geojson"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let selection = Selection::new(["id"]);
    let records = client
        .generic_complete(&[summary("g")], Some(&selection))
        .await
        .unwrap();
    assert_eq!(records[0].warning_geo, json!({}));
}

#[tokio::test]
async fn test_generic_complete_aborts_on_error() {
    let server = MockServer::start().await;
    // advanced clients still raise inside the join
    let client = NinaClient::with_client(
        reqwest::Client::new(),
        ClientConfig::new(server.uri()).advanced(),
    )
    .unwrap();
    mount_warning(&server, "ok").await;

    Mock::given(method("GET"))
        .and(path("/api31/warnings/bad.json"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errorMessages": ["gone"]})))
        .mount(&server)
        .await;

    let warnings = vec![summary("ok"), summary("bad")];
    let err = client.generic_complete(&warnings, None).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("gone"));
}

#[tokio::test]
async fn test_summary_without_id_is_rejected() {
    let (_server, client) = setup().await;
    let err = client
        .generic_complete(&[json!({"version": 1})], None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingField { field: "id", .. }));
}

#[tokio::test]
async fn test_complete_source_fetches_list_first() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api31/katwarn/mapData.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([summary("k1"), summary("k2")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_warning(&server, "k1").await;
    mount_warning(&server, "k2").await;

    let records = client
        .complete_source(WarningSource::Katwarn, None)
        .await
        .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].warning["id"], "k2");
}

#[tokio::test]
async fn test_complete_source_rejects_non_array_feed() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api31/lhp/mapData.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"not": "a list"})))
        .mount(&server)
        .await;

    let err = client
        .complete_source(WarningSource::Lhp, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnexpectedShape { .. }));
}

#[tokio::test]
async fn test_warning_id_stays_one_path_segment() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api31/warnings/a%3Fb.json"))
        .and(query_param("expand", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"identifier": "a?b"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api31/warnings/x%2Fy.geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.warning_detail("a?b", Some("1")).await.unwrap();
    assert_eq!(resp.url.query(), Some("expand=1"));
    client.warning_geo("x/y", None).await.unwrap();
}
