/// gopenapi:path
/// /the/path:
///   description: Shared by both handlers
///   parameters:
///   - name: id
///     in: query
///     description: Ignored, already declared
///   - name: id
///     in: header
///   post:
///     operationId: postThePath
///     responses:
///       "201":
///         description: Created
pub async fn post_the_path() {}
