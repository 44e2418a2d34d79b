use aggregate_buckets::{
    extract_aggregates, extract_aggregates_from_response, extract_aggregates_with, find_aggregate,
    ExtractOptions,
};
use big_s::S;
use maplit::btreemap;
use serde_json::json;

fn response() -> Vec<u8> {
    let response = json!({
        "took": 12,
        "timed_out": false,
        "_shards": { "total": 1, "successful": 1, "skipped": 0, "failed": 0 },
        "hits": {
            "total": { "value": 6, "relation": "eq" },
            "max_score": null,
            "hits": []
        },
        "aggregations": {
            "instruments": {
                "doc_count_error_upper_bound": 0,
                "sum_other_doc_count": 0,
                "buckets": [
                    { "key": "bass", "doc_count": 3 },
                    { "key": "drum", "doc_count": 2 },
                    { "key": "flute", "doc_count": 1 }
                ]
            },
            "recent": {
                "doc_count": 4,
                "by_genre": {
                    "doc_count_error_upper_bound": 0,
                    "sum_other_doc_count": 0,
                    "buckets": [
                        { "key": "jazz", "doc_count": 3 },
                        { "key": "rock", "doc_count": 1 }
                    ]
                }
            },
            "years": {
                "buckets": [
                    { "key": 2019, "doc_count": 4 },
                    { "key": 2020, "doc_count": 2 }
                ]
            },
            "avg_price": { "value": 24.5 }
        }
    });
    serde_json::to_vec(&response).unwrap()
}

#[test]
fn extract_from_a_whole_response() {
    let buckets = extract_aggregates_from_response(&response()).unwrap();

    // numeric keys are not supported, "years" and the metric are left out
    assert_eq!(buckets.len(), 2);

    let instruments = find_aggregate(&buckets, "instruments").unwrap();
    assert_eq!(instruments.key_count, btreemap! { S("bass") => 3, S("drum") => 2, S("flute") => 1 });
    assert_eq!(instruments.total_doc_count(), 6);

    assert!(find_aggregate(&buckets, "recent").is_none());
    let by_genre = find_aggregate(&buckets, "by_genre").unwrap();
    assert_eq!(by_genre.key_count, btreemap! { S("jazz") => 3, S("rock") => 1 });

    insta::assert_json_snapshot!(buckets, @r###"
    [
      {
        "name": "instruments",
        "keyCount": {
          "bass": 3,
          "drum": 2,
          "flute": 1
        }
      },
      {
        "name": "by_genre",
        "keyCount": {
          "jazz": 3,
          "rock": 1
        }
      }
    ]
    "###);
}

#[test]
fn wrapped_in_several_levels() {
    let raw = serde_json::to_vec(&json!({
        "recent": {
            "doc_count": 10,
            "in_stock": {
                "doc_count": 8,
                "by_brand": {
                    "buckets": [{ "key": "yamaha", "doc_count": 8 }]
                }
            }
        }
    }))
    .unwrap();

    let buckets = extract_aggregates(&raw).unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].name, "by_brand");
    assert_eq!(buckets[0].count("yamaha"), Some(8));

    let options = ExtractOptions::default().max_depth(1);
    let buckets = extract_aggregates_with(&raw, &options).unwrap();
    assert!(buckets.is_empty());
}

#[test]
fn concurrent_extractions() {
    let raw = response();
    let expected = extract_aggregates_from_response(&raw).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> =
            (0..4).map(|_| s.spawn(|| extract_aggregates_from_response(&raw).unwrap())).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
