//! HPACK encoder: turns a sequence of [`Header`]s into a wire-format
//! header block, maintaining the sender-side dynamic table.

use bytes::{BufMut, BytesMut};

use super::table::DynamicTable;
use super::{primitive, static_table, Header};

const INDEXED: u8 = 0x80;
const LITERAL_WITH_INDEXING: u8 = 0x40;
const LITERAL_WITHOUT_INDEXING: u8 = 0x00;
const LITERAL_NEVER_INDEXED: u8 = 0x10;
const TABLE_SIZE_UPDATE: u8 = 0x20;

#[derive(Debug)]
pub struct Encoder {
    table: DynamicTable,
    /// A pending `SETTINGS_HEADER_TABLE_SIZE` change from the peer that
    /// hasn't yet been announced via a dynamic-table-size-update
    /// instruction at the head of the next block.
    pending_size_update: Option<usize>,
}

impl Encoder {
    pub fn new(max_size: usize) -> Encoder {
        Encoder { table: DynamicTable::new(max_size), pending_size_update: None }
    }

    /// Called when the peer's SETTINGS_HEADER_TABLE_SIZE changes; the
    /// new bound is announced at the start of the next encoded block.
    pub fn set_max_size(&mut self, new_max: usize) {
        self.pending_size_update = Some(new_max);
    }

    pub fn encode<'a>(&mut self, headers: impl IntoIterator<Item = &'a Header>, dst: &mut BytesMut) {
        if let Some(new_max) = self.pending_size_update.take() {
            self.table.set_max_size(new_max);
            primitive::encode_int(new_max as u64, 5, TABLE_SIZE_UPDATE, dst);
        }

        for header in headers {
            self.encode_header(header, dst);
        }
    }

    fn encode_header(&mut self, header: &Header, dst: &mut BytesMut) {
        if let Some(index) = static_table::index_of_exact(
            std::str::from_utf8(&header.name).unwrap_or(""),
            std::str::from_utf8(&header.value).unwrap_or(""),
        ) {
            primitive::encode_int(index as u64, 7, INDEXED, dst);
            return;
        }

        if let Some(index) = self.table.index_of_exact(&header.name, &header.value) {
            primitive::encode_int((static_table::STATIC_TABLE.len() + index) as u64, 7, INDEXED, dst);
            return;
        }

        let name_index = static_table::index_of_name(std::str::from_utf8(&header.name).unwrap_or(""))
            .or_else(|| self.table.index_of_name(&header.name).map(|i| static_table::STATIC_TABLE.len() + i));

        if header.sensitive {
            self.encode_literal(LITERAL_NEVER_INDEXED, 4, name_index, header, dst);
            return;
        }

        self.encode_literal(LITERAL_WITH_INDEXING, 6, name_index, header, dst);
        self.table.insert(header.name.clone(), header.value.clone());
    }

    fn encode_literal(
        &self,
        representation: u8,
        prefix_bits: u8,
        name_index: Option<usize>,
        header: &Header,
        dst: &mut BytesMut,
    ) {
        match name_index {
            Some(index) => primitive::encode_int(index as u64, prefix_bits, representation, dst),
            None => {
                dst.put_u8(representation);
                primitive::encode_string(&header.name, dst);
            }
        }
        primitive::encode_string(&header.value, dst);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use bytes::Bytes;

    fn h(name: &str, value: &str) -> Header {
        Header::new(Bytes::copy_from_slice(name.as_bytes()), Bytes::copy_from_slice(value.as_bytes()))
    }

    #[test]
    fn static_table_hit_is_single_byte() {
        let mut enc = Encoder::new(4096);
        let mut buf = BytesMut::new();
        enc.encode([&h(":method", "GET")], &mut buf);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf[0] & 0x80, 0x80);
    }

    #[test]
    fn repeated_header_becomes_dynamic_indexed() {
        let mut enc = Encoder::new(4096);
        let mut first = BytesMut::new();
        enc.encode([&h("x-custom", "value")], &mut first);

        let mut second = BytesMut::new();
        enc.encode([&h("x-custom", "value")], &mut second);

        // Second encoding should be a short indexed reference, much
        // shorter than the first literal encoding.
        assert!(second.len() < first.len());
        assert_eq!(second[0] & 0x80, 0x80);
    }

    #[test]
    fn never_indexed_is_not_inserted() {
        let mut enc = Encoder::new(4096);
        let mut buf = BytesMut::new();
        enc.encode([&Header::sensitive(Bytes::from_static(b"authorization"), Bytes::from_static(b"secret"))], &mut buf);
        assert_eq!(buf[0] & 0xf0, LITERAL_NEVER_INDEXED);
        assert_eq!(enc.table.len(), 0);
    }
}
