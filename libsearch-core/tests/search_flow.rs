use libsearch_core::{
    reduce, CardMapping, ContentItem, Generation, PageNumber, Pager, QueryParams, ResultMessages,
    SearchQuery, SearchRequest, SearchViewState, ServerResponse, ViewEvent,
};
use serde_json::{json, Value};

fn messages() -> ResultMessages {
    ResultMessages {
        no_result_title: "No content found".to_string(),
        no_result_text: "Please search with other filters".to_string(),
        search_failed_text: "Fetching content failed".to_string(),
        search_failed_toast: "Could not load search results".to_string(),
    }
}

fn response(raw: Value) -> ServerResponse {
    serde_json::from_value(raw).expect("fixture response")
}

#[test]
fn route_to_rendered_page() {
    let params = QueryParams::from_pairs([
        ("key", "plants"),
        ("board", "CBSE"),
        ("subject", ""),
        ("sort_by", "name"),
        ("sortType", "desc"),
    ]);
    let query = SearchQuery::from_route(Some("2"), &params, PageNumber::FIRST);
    let request = SearchRequest::new(&query.filters, 2, query.page, query.text.clone(), query.sort.as_ref());
    assert_eq!(request.offset(), 2);
    assert!(request.filters.get("subject").is_none());

    let backend = response(json!({
        "result": {
            "count": 5,
            "content": [
                { "identifier": "do_3", "name": "Leaves", "contentType": "Resource" },
                { "identifier": "do_4", "name": "Roots" }
            ]
        }
    }));
    assert!(backend.has_results());

    let mapping = CardMapping {
        meta_data: vec!["identifier".to_string(), "contentType".to_string()],
        ..CardMapping::default()
    };
    let cards = mapping.to_cards(&backend.result.content);
    let pager = Pager::new(backend.result.count, query.page.get(), request.limit, 5).unwrap();

    let state = SearchViewState::default();
    let state = reduce(&state, ViewEvent::RouteChanged { query }, &messages()).state;
    let generation = state.generation.next();
    let state = reduce(&state, ViewEvent::SearchIssued { generation }, &messages()).state;
    let reduced = reduce(
        &state,
        ViewEvent::SearchSucceeded {
            generation,
            total_count: backend.result.count,
            cards,
            pager,
        },
        &messages(),
    );

    assert!(reduced.applied);
    let state = reduced.state;
    assert_eq!(state.page.get(), 2);
    assert_eq!(state.search_list[0].title(), "Leaves");
    assert_eq!(state.search_list[1].object_type, "content");
    assert_eq!(state.pager.as_ref().map(|p| p.total_pages), Some(3));
    assert!(state.can_navigate_to(3));
    assert!(!state.can_navigate_to(4));
    assert!(!state.can_navigate_to(0));
}

#[test]
fn late_response_from_previous_route_is_ignored() {
    let state = SearchViewState::default();
    let first = Generation::default().next();
    let state = reduce(&state, ViewEvent::SearchIssued { generation: first }, &messages()).state;
    let second = first.next();
    let state = reduce(&state, ViewEvent::SearchIssued { generation: second }, &messages()).state;

    let item: ContentItem = serde_json::from_value(json!({ "identifier": "old" })).unwrap();
    let stale = reduce(
        &state,
        ViewEvent::SearchSucceeded {
            generation: first,
            total_count: 1,
            cards: CardMapping::default().to_cards(&[item]),
            pager: Pager::new(1, 1, 10, 5).unwrap(),
        },
        &messages(),
    );
    assert!(!stale.applied);
    assert!(stale.state.search_list.is_empty());
    assert!(stale.state.show_loader);
}
