// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Operations for the landing page.

use crate::db;
use crate::driver::Driver;
use crate::model::BookInstanceStatus;
use futures::try_join;
use locallib_core::driver::{DriverError, DriverResult};

/// Record counts shown on the landing page.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Summary {
    /// Number of books.
    pub(crate) books: u64,

    /// Number of book copies regardless of their status.
    pub(crate) instances: u64,

    /// Number of book copies that can be borrowed.
    pub(crate) available_instances: u64,

    /// Number of authors.
    pub(crate) authors: u64,

    /// Number of genres.
    pub(crate) genres: u64,
}

impl Driver {
    /// Counts all records in the catalog.
    pub(crate) async fn get_summary(self) -> DriverResult<Summary> {
        let (books, instances, available_instances, authors, genres) = try_join!(
            async { Ok::<_, DriverError>(db::count_books(&mut self.db.ex().await?).await?) },
            async { Ok::<_, DriverError>(db::count_instances(&mut self.db.ex().await?).await?) },
            async {
                let mut ex = self.db.ex().await?;
                let count = db::count_instances_by_status(&mut ex, BookInstanceStatus::Available)
                    .await?;
                Ok::<_, DriverError>(count)
            },
            async { Ok::<_, DriverError>(db::count_authors(&mut self.db.ex().await?).await?) },
            async { Ok::<_, DriverError>(db::count_genres(&mut self.db.ex().await?).await?) },
        )?;
        Ok(Summary { books, instances, available_instances, authors, genres })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;

    #[tokio::test]
    async fn test_get_summary_empty() {
        let context = TestContext::setup().await;

        assert_eq!(Summary::default(), context.driver().get_summary().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_summary_counts() {
        let context = TestContext::setup().await;
        let mut ex = context.ex().await;
        let herbert = create_test_author(&mut ex, "Frank", "Herbert").await;
        create_test_author(&mut ex, "Isaac", "Asimov").await;
        let scifi = create_test_genre(&mut ex, "Science Fiction").await;
        create_test_genre(&mut ex, "Poetry").await;
        create_test_genre(&mut ex, "Fantasy").await;
        let dune = create_test_book(&mut ex, "Dune", &herbert, &[&scifi]).await;
        create_test_instance(&mut ex, &dune, "Ace", BookInstanceStatus::Available).await;
        create_test_instance(&mut ex, &dune, "Ace", BookInstanceStatus::Available).await;
        create_test_instance(&mut ex, &dune, "Gollancz", BookInstanceStatus::Loaned).await;
        create_test_instance(&mut ex, &dune, "Chilton", BookInstanceStatus::Maintenance).await;

        assert_eq!(
            Summary { books: 1, instances: 4, available_instances: 2, authors: 2, genres: 3 },
            context.driver().get_summary().await.unwrap()
        );
    }
}
