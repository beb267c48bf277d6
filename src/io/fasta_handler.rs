use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FastaHandlerError {
    #[error("can't access FASTA file '{0}'")]
    Io(String, #[source] std::io::Error),
    #[error("sequence data before the first header in '{0}'")]
    MissingHeader(String),
    #[error("no sequences found in '{0}'")]
    Empty(String),
}

/// One record of a multiple sequence alignment.
#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub seq: String,
}

impl FastaRecord {
    /// Sequence length without gap characters.
    pub fn ungapped_len(&self) -> usize {
        self.seq.chars().filter(|c| *c != '-').count()
    }
}

/// Reader for aligned FASTA files (MAFFT output and the like).
pub struct FastaFileHandler {
    reader: BufReader<File>,
    file_name: String,
}

impl FastaFileHandler {
    pub fn open(fname: impl AsRef<Path>) -> Result<Self, FastaHandlerError> {
        let path = fname.as_ref();
        let file = File::open(path)
            .map_err(|e| FastaHandlerError::Io(path.display().to_string(), e))?;
        Ok(Self {
            reader: BufReader::new(file),
            file_name: path.display().to_string(),
        })
    }

    pub fn read_records(&mut self) -> Result<Vec<FastaRecord>, FastaHandlerError> {
        let mut records: Vec<FastaRecord> = vec![];
        for line in self.reader.by_ref().lines() {
            let line = line.map_err(|e| FastaHandlerError::Io(self.file_name.clone(), e))?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            if let Some(header) = line.strip_prefix('>') {
                let id = header
                    .split_whitespace()
                    .next()
                    .unwrap_or(header)
                    .to_string();
                records.push(FastaRecord {
                    id,
                    seq: String::new(),
                });
            } else {
                match records.last_mut() {
                    Some(rec) => rec.seq.push_str(line.trim()),
                    None => {
                        return Err(FastaHandlerError::MissingHeader(self.file_name.clone()))
                    }
                }
            }
        }
        if records.is_empty() {
            return Err(FastaHandlerError::Empty(self.file_name.clone()));
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_msa_fixture() -> Result<(), FastaHandlerError> {
        let mut h = FastaFileHandler::open("tests/mini_msa.fasta")?;
        let recs = h.read_records()?;
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].seq.len(), recs[1].seq.len());
        assert!(recs[0].ungapped_len() <= recs[0].seq.len());
        Ok(())
    }
}
