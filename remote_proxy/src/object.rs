//! Channel-bound convenience wrappers

use crate::access;
use bridge_types::{BridgeConfig, BridgeResult, RemoteHandle, Value, ValueKind};
use exec_channel::ExecutionChannel;

/// A channel together with the configuration used to talk over it
pub struct Bridge<C> {
    channel: C,
    config: BridgeConfig,
}

impl<C: ExecutionChannel> Bridge<C> {
    pub fn new(channel: C) -> Self {
        Self::with_config(channel, BridgeConfig::default())
    }

    pub fn with_config(channel: C, config: BridgeConfig) -> Self {
        Self { channel, config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Evaluates source text and decodes the result as `kind`
    pub fn evaluate(&mut self, source: &str, kind: &ValueKind) -> BridgeResult<Value> {
        access::evaluate(&mut self.channel, source, kind, &self.config)
    }

    /// Binds a handle to this bridge
    pub fn object(&mut self, handle: impl Into<RemoteHandle>) -> RemoteObject<'_, C> {
        RemoteObject {
            channel: &mut self.channel,
            config: &self.config,
            handle: handle.into(),
        }
    }
}

/// A remote handle bound to a borrowed channel
pub struct RemoteObject<'c, C> {
    channel: &'c mut C,
    config: &'c BridgeConfig,
    handle: RemoteHandle,
}

impl<'c, C: ExecutionChannel> RemoteObject<'c, C> {
    pub fn new(channel: &'c mut C, config: &'c BridgeConfig, handle: RemoteHandle) -> Self {
        Self {
            channel,
            config,
            handle,
        }
    }

    pub fn handle(&self) -> &RemoteHandle {
        &self.handle
    }

    /// Reads the whole object as `kind`
    pub fn value(&mut self, kind: &ValueKind) -> BridgeResult<Value> {
        access::read_value(&mut *self.channel, &self.handle, kind, self.config)
    }

    pub fn get(&mut self, field: &str, kind: &ValueKind) -> BridgeResult<Value> {
        access::get_field(&mut *self.channel, &self.handle, field, kind, self.config)
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> BridgeResult<()> {
        access::set_field(
            &mut *self.channel,
            &self.handle,
            field,
            &value.into(),
            self.config,
        )
    }

    pub fn call(
        &mut self,
        method: &str,
        positional: &[Value],
        keyword: &[(String, Value)],
        returns: &ValueKind,
    ) -> BridgeResult<Value> {
        access::call_method(
            &mut *self.channel,
            &self.handle,
            method,
            positional,
            keyword,
            returns,
            self.config,
        )
    }

    /// Calls a constructor-style method and binds the new object
    pub fn construct(
        &mut self,
        method: &str,
        positional: &[Value],
        keyword: &[(String, Value)],
    ) -> BridgeResult<RemoteObject<'_, C>> {
        let handle = access::call_constructor(
            &mut *self.channel,
            &self.handle,
            method,
            positional,
            keyword,
            self.config,
        )?;
        Ok(RemoteObject::new(&mut *self.channel, self.config, handle))
    }

    /// Binds `self.field` without a round trip
    pub fn field(&mut self, field: &str) -> BridgeResult<RemoteObject<'_, C>> {
        let handle = self.handle.child(field)?;
        Ok(RemoteObject::new(&mut *self.channel, self.config, handle))
    }

    /// Binds `self[index]` without a round trip
    pub fn item(&mut self, index: i64) -> RemoteObject<'_, C> {
        let handle = self.handle.index(index);
        RemoteObject::new(&mut *self.channel, self.config, handle)
    }

    /// Binds `self["key"]` without a round trip
    pub fn entry(&mut self, key: &str) -> RemoteObject<'_, C> {
        let handle = access::key(&self.handle, key);
        RemoteObject::new(&mut *self.channel, self.config, handle)
    }
}
