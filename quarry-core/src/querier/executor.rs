use crate::{Query, Result, RowLabeled, stream::Stream};

/// Backend able to run a built query and stream back its labeled rows.
///
/// Backend failures are reported unchanged through the stream. Dropping the
/// stream cancels the call, deadlines are applied by the caller around it.
pub trait Executor: Send {
    fn fetch(&mut self, query: Query) -> impl Stream<Item = Result<RowLabeled>> + Send;
}
