mod support;

use httpmock::Method::{GET, POST, PATCH};
use httpmock::MockServer;
use serde_json::json;

use kino_client::api::queries;
use kino_client::gateway;
use kino_client::models::{BundleTier, MediaKind, Movie, PurchaseTarget};

use support::{build_state, list_body, metric_doc, movie_doc, purchase_doc};

const FUTURE: &str = "2031-01-01T00:00:00.000Z";

#[tokio::test]
async fn movie_lookup_maps_missing_document_to_none() {
    let server = MockServer::start();
    let state = build_state(&server);

    let found = server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/movies/documents/m1");
        then.status(200).json_body(movie_doc("m1", "Amra", "movie"));
    });
    let missing = server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/movies/documents/gone");
        then.status(404).json_body(json!({
            "message": "Document with the requested ID could not be found.",
            "code": 404,
            "type": "document_not_found",
        }));
    });

    let movie = gateway::movie_by_id(&state, "m1").await.unwrap().unwrap();
    assert_eq!(movie.title, "Amra");
    assert_eq!(movie.kind, MediaKind::Movie);

    assert!(gateway::movie_by_id(&state, "gone").await.unwrap().is_none());

    found.assert();
    missing.assert();
}

#[tokio::test]
async fn search_sends_fulltext_query() {
    let server = MockServer::start();
    let state = build_state(&server);

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/movies/documents")
            .query_param("queries[]", queries::search("title", "batman"));
        then.status(200)
            .json_body(list_body(&[movie_doc("m1", "Batman", "movie")]));
    });

    let movies = gateway::search_movies(&state, "batman").await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].id, "m1");
    mock.assert();
}

#[tokio::test]
async fn search_with_no_match_returns_empty_list() {
    let server = MockServer::start();
    let state = build_state(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/movies/documents");
        then.status(200).json_body(list_body(&[]));
    });

    let movies = gateway::search_movies(&state, "nothing").await.unwrap();
    assert!(movies.is_empty());
}

#[tokio::test]
async fn category_listing_filters_by_attribute() {
    let server = MockServer::start();
    let state = build_state(&server);

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/movies/documents")
            .query_param("queries[]", queries::equal("category", "action"));
        then.status(200).json_body(list_body(&[
            movie_doc("m1", "Amra", "movie"),
            movie_doc("m2", "Khatan", "series"),
        ]));
    });

    let movies = gateway::movies_by_category(&state, "action").await.unwrap();
    assert_eq!(movies.len(), 2);
    mock.assert();
}

#[tokio::test]
async fn first_search_for_term_creates_metric_row() {
    let server = MockServer::start();
    let state = build_state(&server);
    let movie: Movie = serde_json::from_value(movie_doc("m7", "Conan", "movie")).unwrap();

    let lookup = server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/metrics/documents")
            .query_param("queries[]", queries::equal("searchTerm", "conan"))
            .query_param("queries[]", queries::limit(1));
        then.status(200).json_body(list_body(&[]));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/databases/db/collections/metrics/documents")
            .json_body(json!({
                "documentId": "unique()",
                "data": {
                    "searchTerm": "conan",
                    "movie_id": "m7",
                    "title": "Conan",
                    "poster_url": "https://cdn.example/m7.jpg",
                    "count": 1,
                },
            }));
        then.status(201)
            .json_body(metric_doc("mt1", "conan", "m7", "Conan", 1));
    });

    gateway::record_search_hit(&state, "conan", &movie)
        .await
        .unwrap();

    lookup.assert();
    create.assert();
}

#[tokio::test]
async fn repeated_search_increments_existing_metric_row() {
    let server = MockServer::start();
    let state = build_state(&server);
    let movie: Movie = serde_json::from_value(movie_doc("m7", "Conan", "movie")).unwrap();

    let lookup = server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/metrics/documents")
            .query_param("queries[]", queries::equal("searchTerm", "conan"));
        then.status(200)
            .json_body(list_body(&[metric_doc("mt1", "conan", "m7", "Conan", 1)]));
    });
    let bump = server.mock(|when, then| {
        when.method(PATCH)
            .path("/databases/db/collections/metrics/documents/mt1")
            .json_body(json!({ "data": { "count": 2 } }));
        then.status(200)
            .json_body(metric_doc("mt1", "conan", "m7", "Conan", 2));
    });
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/databases/db/collections/metrics/documents");
        then.status(201).json_body(json!({}));
    });

    gateway::record_search_hit(&state, "conan", &movie)
        .await
        .unwrap();

    lookup.assert();
    bump.assert();
    assert_eq!(create.hits(), 0);
}

#[tokio::test]
async fn trending_merges_terms_for_the_same_movie() {
    let server = MockServer::start();
    let state = build_state(&server);

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/metrics/documents")
            .query_param("queries[]", queries::order_desc("count"))
            .query_param("queries[]", queries::limit(25));
        then.status(200).json_body(list_body(&[
            metric_doc("t3", "c", "Y", "Movie Y", 10),
            metric_doc("t1", "a", "X", "Movie X", 3),
            metric_doc("t2", "b", "X", "Movie X", 2),
        ]));
    });

    let trending = gateway::trending_movies(&state).await.unwrap();
    assert_eq!(trending.len(), 2);
    assert_eq!(trending[0].movie_id, "Y");
    assert_eq!(trending[0].total_count, 10);
    assert_eq!(trending[1].movie_id, "X");
    assert_eq!(trending[1].total_count, 5);
    mock.assert();
}

#[tokio::test]
async fn trending_is_capped_at_five_movies() {
    let server = MockServer::start();
    let state = build_state(&server);

    let rows: Vec<_> = (1..=6i64)
        .rev()
        .map(|n| {
            metric_doc(
                &format!("t{n}"),
                &format!("term{n}"),
                &format!("m{n}"),
                &format!("Movie {n}"),
                n,
            )
        })
        .collect();
    server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/metrics/documents");
        then.status(200).json_body(list_body(&rows));
    });

    let trending = gateway::trending_movies(&state).await.unwrap();
    assert_eq!(trending.len(), 5);
    assert_eq!(trending[0].total_count, 6);
    assert!(trending.iter().all(|t| t.movie_id != "m1"));
}

#[tokio::test]
async fn purchase_listing_filters_paid_and_unexpired_server_side() {
    let server = MockServer::start();
    let state = build_state(&server);

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/purchases/documents")
            .query_param("queries[]", queries::equal("userId", "u1"))
            .query_param("queries[]", queries::equal("status", "PAID"));
        then.status(200).json_body(list_body(&[
            purchase_doc("p1", "u1", "ALL_ACCESS_PREMIUM", FUTURE),
            purchase_doc("p2", "u1", "m42", FUTURE),
        ]));
    });

    let purchases = gateway::user_purchases(&state, "u1").await.unwrap();
    assert_eq!(purchases.len(), 2);
    assert_eq!(
        purchases[0].target,
        PurchaseTarget::Bundle(BundleTier::Premium)
    );
    assert_eq!(
        purchases[1].target,
        PurchaseTarget::Content("m42".to_string())
    );
    assert!(purchases.iter().all(|p| p.status.is_paid()));
    mock.assert();
}

#[tokio::test]
async fn library_skips_bundles_and_deleted_titles() {
    let server = MockServer::start();
    let state = build_state(&server);

    server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/purchases/documents");
        then.status(200).json_body(list_body(&[
            purchase_doc("p1", "u1", "ALL_ACCESS_PREMIUM", FUTURE),
            purchase_doc("p2", "u1", "m1", FUTURE),
            purchase_doc("p3", "u1", "m2", FUTURE),
        ]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/movies/documents/m1");
        then.status(200).json_body(movie_doc("m1", "Amra", "movie"));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/databases/db/collections/movies/documents/m2");
        then.status(404).json_body(json!({
            "message": "Document with the requested ID could not be found.",
            "code": 404,
            "type": "document_not_found",
        }));
    });

    let library = gateway::user_library(&state, "u1").await.unwrap();
    assert_eq!(library.len(), 1);
    assert_eq!(library[0].movie.id, "m1");
    assert_eq!(
        library[0].expires_at,
        FUTURE.parse::<chrono::DateTime<chrono::Utc>>().unwrap()
    );
}
