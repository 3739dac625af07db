use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::RecordId;
use crate::source::MediaSource;

pub fn run<S: MediaSource>(source: &S, id: RecordId) -> Result<CmdResult> {
    let record = source.get_record(id)?;
    Ok(CmdResult::default().with_listed(vec![record]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use crate::source::memory::fixtures::SourceFixture;

    #[test]
    fn shows_single_record() {
        let source = SourceFixture::new().with_images(2).source;
        let result = run(&source, 2).unwrap();
        assert_eq!(result.listed.len(), 1);
        assert_eq!(result.listed[0].id(), Some(2));
    }

    #[test]
    fn missing_record_is_an_error() {
        let source = SourceFixture::new().source;
        assert!(matches!(run(&source, 9), Err(MediaError::RecordNotFound(9))));
    }
}
