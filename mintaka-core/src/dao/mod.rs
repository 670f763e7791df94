mod metadata_dao;

pub use metadata_dao::MetadataDao;
