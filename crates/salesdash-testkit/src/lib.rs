// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use salesdash_app::ResultPage;

pub use salesdash_db::demo::RepFaker;

/// A page of `count` generated reps reporting the given totals.
pub fn fixture_page(seed: u64, count: usize, total_pages: u32, total_count: u64) -> ResultPage {
    ResultPage {
        rows: RepFaker::new(seed).sales_reps(count),
        total_pages,
        total_count,
    }
}
