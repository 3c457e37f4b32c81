use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use sealnotes_core::storage::MemoryNoteStore;
use sealnotes_core::{Note, NoteCreate, NoteService, NoteUpdate};

const OWNER: &str = "owner-1";
const OTHER_OWNER: &str = "owner-2";

#[derive(Debug, Clone)]
enum Op {
    Create,
    CreateForOther,
    Update(usize),
    Delete(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        1 => Just(Op::CreateForOther),
        2 => any::<usize>().prop_map(Op::Update),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

fn create(service: &NoteService, owner: &str, n: usize) -> String {
    service
        .create_note(
            owner,
            NoteCreate {
                title: format!("note {}", n),
                content: format!("content {}", n),
                is_encrypted: false,
                encryption_password: None,
            },
        )
        .unwrap()
        .id
}

fn run(ops: &[Op]) -> (NoteService, Vec<String>) {
    let service = NoteService::new(Arc::new(MemoryNoteStore::new()));
    let mut live: Vec<String> = Vec::new();

    for (n, op) in ops.iter().enumerate() {
        match op {
            Op::Create => live.push(create(&service, OWNER, n)),
            Op::CreateForOther => {
                create(&service, OTHER_OWNER, n);
            }
            Op::Update(pick) if !live.is_empty() => {
                let note_id = &live[pick % live.len()];
                service
                    .update_note(
                        note_id,
                        OWNER,
                        NoteUpdate {
                            content: Some(format!("edit {}", n)),
                            ..Default::default()
                        },
                    )
                    .unwrap();
            }
            Op::Delete(pick) if !live.is_empty() => {
                let note_id = live.remove(pick % live.len());
                assert!(service.delete_note(&note_id, OWNER).unwrap());
            }
            _ => {}
        }
    }

    (service, live)
}

fn paged(service: &NoteService, page_size: usize) -> Vec<Note> {
    let mut notes = Vec::new();
    let mut skip = 0;
    loop {
        let page = service.list_notes(OWNER, skip, page_size).unwrap();
        if page.is_empty() {
            break;
        }
        skip += page.len();
        notes.extend(page);
    }
    notes
}

#[test]
fn listing_matches_live_set() {
    proptest!(ProptestConfig::with_cases(64), |(ops in prop::collection::vec(op(), 0..40), page_size in 1usize..8)| {
        let (service, live) = run(&ops);

        let listed = paged(&service, page_size);
        let listed_ids: Vec<&str> = listed.iter().map(|note| note.id.as_str()).collect();

        let unique: BTreeSet<&str> = listed_ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), listed_ids.len());

        let expected: BTreeSet<&str> = live.iter().map(String::as_str).collect();
        prop_assert_eq!(unique, expected);
        prop_assert_eq!(service.count_notes(OWNER).unwrap(), live.len());
    });
}

#[test]
fn listing_is_most_recent_first() {
    proptest!(ProptestConfig::with_cases(64), |(ops in prop::collection::vec(op(), 0..40))| {
        let (service, _) = run(&ops);

        let listed = service.list_notes(OWNER, 0, 100).unwrap();
        for pair in listed.windows(2) {
            prop_assert!(pair[0].updated_at >= pair[1].updated_at);
        }
    });
}

#[test]
fn pages_concatenate_to_full_listing() {
    proptest!(ProptestConfig::with_cases(64), |(ops in prop::collection::vec(op(), 0..40), page_size in 1usize..8)| {
        let (service, _) = run(&ops);

        let full: Vec<String> = service
            .list_notes(OWNER, 0, 100)
            .unwrap()
            .into_iter()
            .map(|note| note.id)
            .collect();
        let concatenated: Vec<String> = paged(&service, page_size)
            .into_iter()
            .map(|note| note.id)
            .collect();

        prop_assert_eq!(concatenated, full);
    });
}
