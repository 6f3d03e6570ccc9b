use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

pub struct FileOps {
    file_path: PathBuf,
}

impl FileOps {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Reads one command per line, in file order, skipping blank lines.
    pub fn load_lines(&self) -> io::Result<Vec<String>> {
        let reader = BufReader::new(File::open(&self.file_path)?);
        let mut lines = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if !line.trim().is_empty() {
                lines.push(line.to_string());
            }
        }

        Ok(lines)
    }

    pub fn write_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> io::Result<()> {
        self.write_with(File::create(&self.file_path)?, lines)
    }

    pub fn append_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> io::Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.file_path)?;
        self.write_with(file, lines)
    }

    fn write_with<'a>(&self, file: File, lines: impl IntoIterator<Item = &'a str>) -> io::Result<()> {
        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()
    }
}
