//! Types and aliases every configuration starts with

use std::sync::Arc;

use crate::catalog::{Constructor, TypeDescriptor};
use crate::database_id::VendorDatabaseIdProvider;
use crate::datasource::{PooledDataSourceFactory, UnpooledDataSourceFactory};
use crate::factory::{DefaultObjectFactory, DefaultObjectWrapperFactory, DefaultReflectorFactory, DefaultVfs};
use crate::transaction::{JdbcTransactionFactory, ManagedTransactionFactory};
use crate::type_handler::{EnumTypeHandler, JdbcType, TypeHandler, ValueTypeHandler};

pub const JDBC_TRANSACTION_FACTORY: &str = "sqlweave::transaction::JdbcTransactionFactory";
pub const MANAGED_TRANSACTION_FACTORY: &str = "sqlweave::transaction::ManagedTransactionFactory";
pub const UNPOOLED_DATA_SOURCE_FACTORY: &str = "sqlweave::datasource::UnpooledDataSourceFactory";
pub const POOLED_DATA_SOURCE_FACTORY: &str = "sqlweave::datasource::PooledDataSourceFactory";
pub const VENDOR_DATABASE_ID_PROVIDER: &str = "sqlweave::database_id::VendorDatabaseIdProvider";
pub const DEFAULT_OBJECT_FACTORY: &str = "sqlweave::factory::DefaultObjectFactory";
pub const DEFAULT_OBJECT_WRAPPER_FACTORY: &str = "sqlweave::factory::DefaultObjectWrapperFactory";
pub const DEFAULT_REFLECTOR_FACTORY: &str = "sqlweave::factory::DefaultReflectorFactory";
pub const DEFAULT_VFS: &str = "sqlweave::factory::DefaultVfs";
pub const ENUM_TYPE_HANDLER: &str = "sqlweave::type_handler::EnumTypeHandler";

fn jdbc_transaction_factory() -> Box<dyn crate::transaction::TransactionFactory> {
    Box::new(JdbcTransactionFactory)
}

fn managed_transaction_factory() -> Box<dyn crate::transaction::TransactionFactory> {
    Box::new(ManagedTransactionFactory::default())
}

fn unpooled_data_source_factory() -> Box<dyn crate::datasource::DataSourceFactory> {
    Box::new(UnpooledDataSourceFactory::default())
}

fn pooled_data_source_factory() -> Box<dyn crate::datasource::DataSourceFactory> {
    Box::new(PooledDataSourceFactory::default())
}

fn vendor_database_id_provider() -> Box<dyn crate::database_id::DatabaseIdProvider> {
    Box::new(VendorDatabaseIdProvider::default())
}

fn default_object_factory() -> Box<dyn crate::factory::ObjectFactory> {
    Box::new(DefaultObjectFactory::default())
}

fn default_object_wrapper_factory() -> Box<dyn crate::factory::ObjectWrapperFactory> {
    Box::new(DefaultObjectWrapperFactory)
}

fn default_reflector_factory() -> Box<dyn crate::factory::ReflectorFactory> {
    Box::new(DefaultReflectorFactory::default())
}

fn default_vfs() -> Arc<dyn crate::factory::Vfs> {
    Arc::new(DefaultVfs)
}

fn enum_type_handler(semantic: Option<&str>) -> Arc<dyn TypeHandler> {
    Arc::new(EnumTypeHandler::new(semantic))
}

pub(crate) const BUILTIN_TYPES: &[TypeDescriptor] = &[
    TypeDescriptor::new(JDBC_TRANSACTION_FACTORY, Constructor::TransactionFactory(jdbc_transaction_factory)),
    TypeDescriptor::new(MANAGED_TRANSACTION_FACTORY, Constructor::TransactionFactory(managed_transaction_factory)),
    TypeDescriptor::new(UNPOOLED_DATA_SOURCE_FACTORY, Constructor::DataSourceFactory(unpooled_data_source_factory)),
    TypeDescriptor::new(POOLED_DATA_SOURCE_FACTORY, Constructor::DataSourceFactory(pooled_data_source_factory)),
    TypeDescriptor::new(VENDOR_DATABASE_ID_PROVIDER, Constructor::DatabaseIdProvider(vendor_database_id_provider)),
    TypeDescriptor::new(DEFAULT_OBJECT_FACTORY, Constructor::ObjectFactory(default_object_factory)),
    TypeDescriptor::new(DEFAULT_OBJECT_WRAPPER_FACTORY, Constructor::ObjectWrapperFactory(default_object_wrapper_factory)),
    TypeDescriptor::new(DEFAULT_REFLECTOR_FACTORY, Constructor::ReflectorFactory(default_reflector_factory)),
    TypeDescriptor::new(DEFAULT_VFS, Constructor::Vfs(default_vfs)),
    TypeDescriptor::new(ENUM_TYPE_HANDLER, Constructor::TypeHandler(enum_type_handler)),
    TypeDescriptor::new("String", Constructor::Value),
    TypeDescriptor::new("i8", Constructor::Value),
    TypeDescriptor::new("i16", Constructor::Value),
    TypeDescriptor::new("i32", Constructor::Value),
    TypeDescriptor::new("i64", Constructor::Value),
    TypeDescriptor::new("f32", Constructor::Value),
    TypeDescriptor::new("f64", Constructor::Value),
    TypeDescriptor::new("bool", Constructor::Value),
    TypeDescriptor::new("Vec<u8>", Constructor::Value),
    TypeDescriptor::new("HashMap", Constructor::Value),
    TypeDescriptor::new("Vec", Constructor::Value),
];

pub(crate) const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("JDBC", JDBC_TRANSACTION_FACTORY),
    ("MANAGED", MANAGED_TRANSACTION_FACTORY),
    ("UNPOOLED", UNPOOLED_DATA_SOURCE_FACTORY),
    ("POOLED", POOLED_DATA_SOURCE_FACTORY),
    ("DB_VENDOR", VENDOR_DATABASE_ID_PROVIDER),
    ("string", "String"),
    ("byte", "i8"),
    ("short", "i16"),
    ("int", "i32"),
    ("integer", "i32"),
    ("long", "i64"),
    ("float", "f32"),
    ("double", "f64"),
    ("boolean", "bool"),
    ("bytes", "Vec<u8>"),
    ("map", "HashMap"),
    ("hashmap", "HashMap"),
    ("list", "Vec"),
];

const STRING_WIRE: &[JdbcType] = &[
    JdbcType::Varchar,
    JdbcType::Char,
    JdbcType::Longvarchar,
    JdbcType::Nvarchar,
    JdbcType::Nchar,
    JdbcType::Clob,
];

static VALUE_HANDLERS: &[ValueTypeHandler] = &[
    ValueTypeHandler::new("StringTypeHandler", "String", STRING_WIRE),
    ValueTypeHandler::new("ByteTypeHandler", "i8", &[JdbcType::Tinyint]),
    ValueTypeHandler::new("ShortTypeHandler", "i16", &[JdbcType::Smallint]),
    ValueTypeHandler::new("IntegerTypeHandler", "i32", &[JdbcType::Integer]),
    ValueTypeHandler::new("LongTypeHandler", "i64", &[JdbcType::Bigint]),
    ValueTypeHandler::new("FloatTypeHandler", "f32", &[JdbcType::Float, JdbcType::Real]),
    ValueTypeHandler::new("DoubleTypeHandler", "f64", &[JdbcType::Double]),
    ValueTypeHandler::new("BooleanTypeHandler", "bool", &[JdbcType::Boolean, JdbcType::Bit]),
    ValueTypeHandler::new(
        "ByteArrayTypeHandler",
        "Vec<u8>",
        &[JdbcType::Binary, JdbcType::Varbinary, JdbcType::Longvarbinary, JdbcType::Blob],
    ),
];

pub(crate) fn builtin_value_handlers() -> Vec<Arc<dyn TypeHandler>> {
    VALUE_HANDLERS
        .iter()
        .map(|handler| Arc::new(handler.clone()) as Arc<dyn TypeHandler>)
        .collect()
}
