use crate::error::ChangesUtilsError;
use std::io::Write;

pub trait TableWriter {
    fn set_header(&mut self, items: &[String]);
    fn header(&self) -> &[String];
    fn write_row(&mut self, items: &[&str]) -> Result<(), ChangesUtilsError>;
    fn flush(&mut self) -> Result<(), ChangesUtilsError>;
    fn write_header(&mut self) -> Result<(), ChangesUtilsError> {
        let header: Vec<_> = self.header().iter().map(|x| x.to_string()).collect();
        self.write_row(&header.iter().map(|x| x.as_str()).collect::<Vec<&str>>())
    }

    fn write_row_bytes(&mut self, items: &[&[u8]]) -> Result<(), ChangesUtilsError>;
}

impl<T: TableWriter + ?Sized> TableWriter for Box<T> {
    fn set_header(&mut self, items: &[String]) {
        (**self).set_header(items)
    }
    fn header(&self) -> &[String] {
        (**self).header()
    }
    fn write_row(&mut self, items: &[&str]) -> Result<(), ChangesUtilsError> {
        (**self).write_row(items)
    }
    fn flush(&mut self) -> Result<(), ChangesUtilsError> {
        (**self).flush()
    }
    fn write_header(&mut self) -> Result<(), ChangesUtilsError> {
        (**self).write_header()
    }
    fn write_row_bytes(&mut self, items: &[&[u8]]) -> Result<(), ChangesUtilsError> {
        (**self).write_row_bytes(items)
    }
}

impl<T: TableWriter + ?Sized> TableWriter for &mut T {
    fn set_header(&mut self, items: &[String]) {
        (**self).set_header(items)
    }
    fn header(&self) -> &[String] {
        (**self).header()
    }
    fn write_row(&mut self, items: &[&str]) -> Result<(), ChangesUtilsError> {
        (**self).write_row(items)
    }
    fn flush(&mut self) -> Result<(), ChangesUtilsError> {
        (**self).flush()
    }
    fn write_header(&mut self) -> Result<(), ChangesUtilsError> {
        (**self).write_header()
    }
    fn write_row_bytes(&mut self, items: &[&[u8]]) -> Result<(), ChangesUtilsError> {
        (**self).write_row_bytes(items)
    }
}

/// Field separator of a projected table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    pub fn extension(&self) -> &'static str {
        match self {
            Delimiter::Comma => "csv",
            Delimiter::Tab => "tsv",
        }
    }

    pub fn create_writer<'a, W: Write + 'a>(&self, writer: W) -> Box<dyn TableWriter + 'a> {
        match self {
            Delimiter::Comma => Box::new(CSVWriter::new(writer)),
            Delimiter::Tab => Box::new(TSVWriter::new(writer)),
        }
    }
}

#[derive(Debug)]
pub struct TSVWriter<W: Write> {
    writer: W,
    header: Vec<String>,
}

impl<W: Write> TSVWriter<W> {
    pub fn new(writer: W) -> Self {
        TSVWriter {
            writer,
            header: Vec::new(),
        }
    }
}

impl<W: Write> TableWriter for TSVWriter<W> {
    fn set_header(&mut self, items: &[String]) {
        self.header.clear();
        self.header.extend_from_slice(items);
    }

    fn header(&self) -> &[String] {
        &self.header
    }

    fn write_row(&mut self, items: &[&str]) -> Result<(), ChangesUtilsError> {
        for (i, data) in items.iter().enumerate() {
            if i != 0 {
                self.writer.write_all(b"\t")?;
            }
            write!(self.writer, "{}", data)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_row_bytes(&mut self, items: &[&[u8]]) -> Result<(), ChangesUtilsError> {
        for (i, data) in items.iter().enumerate() {
            if i != 0 {
                self.writer.write_all(b"\t")?;
            }
            self.writer.write_all(data)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ChangesUtilsError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct CSVWriter<W: Write> {
    writer: csv::Writer<W>,
    header: Vec<String>,
}

impl<W: Write> CSVWriter<W> {
    pub fn new(writer: W) -> Self {
        CSVWriter {
            writer: csv::Writer::from_writer(writer),
            header: Vec::new(),
        }
    }
}

impl<W: Write> TableWriter for CSVWriter<W> {
    fn set_header(&mut self, items: &[String]) {
        self.header.clear();
        self.header.extend_from_slice(items);
    }

    fn header(&self) -> &[String] {
        &self.header
    }

    fn write_row(&mut self, items: &[&str]) -> Result<(), ChangesUtilsError> {
        self.writer.write_record(items)?;
        Ok(())
    }

    fn write_row_bytes(&mut self, items: &[&[u8]]) -> Result<(), ChangesUtilsError> {
        self.writer.write_record(items)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ChangesUtilsError> {
        self.writer.flush()?;
        Ok(())
    }
}
