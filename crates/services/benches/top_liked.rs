//! Benchmarks for the ranking view.
//!
//! Run with: cargo bench --package services
//!
//! Seeds a deterministic catalog (no dataset files needed) and measures
//! top-N ranking over it.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use std::sync::Arc;

use catalog::{Film, User};
use chrono::NaiveDate;
use services::{FilmService, UserService};
use storage::MemoryStore;

const FILMS: u32 = 1_000;
const USERS: u32 = 500;

fn seed_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let users = UserService::new(Arc::clone(&store));
    let films = FilmService::new(Arc::clone(&store));

    for i in 0..USERS {
        users
            .create(User {
                id: 0,
                email: format!("user{i}@example.com"),
                login: format!("user{i}"),
                name: String::new(),
                birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            })
            .expect("valid user");
    }

    for i in 0..FILMS {
        let film = films
            .create(Film {
                id: 0,
                name: format!("Film {i}"),
                description: String::new(),
                release_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                duration: 90,
                genre_ids: vec![],
                rating_id: None,
            })
            .expect("valid film");

        // Deterministic skew: film k gets likes from users whose id divides it
        for user_id in 1..=USERS {
            if film.id % user_id == 0 {
                films.add_like(film.id, user_id).expect("like");
            }
        }
    }

    store
}

fn bench_top_liked(c: &mut Criterion) {
    let store = seed_store();
    let films = FilmService::new(store);

    c.bench_function("top_liked_10", |b| {
        b.iter(|| {
            let top = films.top_liked(black_box(10));
            black_box(top)
        })
    });

    let store = seed_store();
    let films = FilmService::new(store);
    c.bench_function("top_liked_all", |b| {
        b.iter(|| {
            let top = films.top_liked(black_box(FILMS as i64));
            black_box(top)
        })
    });
}

criterion_group!(benches, bench_top_liked);
criterion_main!(benches);
