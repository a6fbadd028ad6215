// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod schema;
mod store;

pub use schema::initialize_schema;
pub use store::SqliteStore;
