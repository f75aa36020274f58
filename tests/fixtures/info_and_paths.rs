//! Service entry point.

/// gopenapi:info
/// title: Pet Store
/// description: Pets and their owners.
/// version: 1.0.0
/// contact:
///   name: Jimbob Jones
///   email: jimbob@example.com
/// license:
///   name: Apache 2.0
///   url: https://www.apache.org/licenses/LICENSE-2.0.html
fn main() {
    serve();
}

/// gopenapi:path
/// /ping:
///   get:
///     summary: Liveness check
///     responses:
///       "200":
///         description: Service is up
///         content:
///           text/plain:
///             example: pong
pub fn ping() -> &'static str {
    "pong"
}

// gopenapi:path
// /hidden: {}
fn serve() {}
