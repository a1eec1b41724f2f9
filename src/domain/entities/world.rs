//! World Archive Entity
//!
//! 압축된 월드 파일을 통째로 보관하는 바이너리 엔티티입니다.

use std::io::Read;

use crate::data_collection;
use crate::domain::entities::StorableBinaryData;

/// 월드 바이너리 데이터
///
/// 키 형식은 `"{bucket}:{world_id}"`입니다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldBinaryData {
    pub key: String,
    pub data: Vec<u8>,
}

data_collection!(WorldBinaryData, name = "worlds", key = key);

impl WorldBinaryData {
    pub fn new(bucket: &str, world_id: &str, data: Vec<u8>) -> Self {
        Self {
            key: Self::key_for(bucket, world_id),
            data,
        }
    }

    /// 버킷과 월드 ID로 저장 키를 만듭니다.
    pub fn key_for(bucket: &str, world_id: &str) -> String {
        format!("{}:{}", bucket, world_id)
    }
}

impl StorableBinaryData for WorldBinaryData {
    fn open(&self) -> Box<dyn Read + '_> {
        Box::new(self.data.as_slice())
    }

    fn load(&mut self, reader: &mut dyn Read) -> std::io::Result<()> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        self.data = buffer;
        Ok(())
    }

    fn size_in_bytes(&self) -> u64 {
        self.data.len() as u64
    }

    fn restore_key(&mut self, key: &str) {
        self.key = key.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DataCollection;

    #[test]
    fn test_world_key_format() {
        let world = WorldBinaryData::new("lobby", "spawn-1", vec![1, 2, 3]);

        assert_eq!(world.key, "lobby:spawn-1");
        assert_eq!(world.data_key(), Some("lobby:spawn-1"));
        assert_eq!(WorldBinaryData::COLLECTION_NAME, "worlds");
        assert_eq!(WorldBinaryData::KEY_FIELD, "key");
    }

    #[test]
    fn test_open_and_load_round_trip_bytes() {
        let source = WorldBinaryData::new("maps", "arena", vec![9, 8, 7, 6]);
        let mut target = WorldBinaryData::default();

        target.load(&mut source.open()).unwrap();

        assert_eq!(target.data, vec![9, 8, 7, 6]);
        assert_eq!(target.size_in_bytes(), 4);
    }
}
