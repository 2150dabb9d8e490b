//! Field, method, and constructor access through a channel

use bridge_types::{BridgeConfig, BridgeResult, RemoteHandle, Value, ValueKind};
use exec_channel::{ChannelError, ExecutionChannel};
use literal_codec::{decode, decode_handle, encode, encode_call_args, encode_string};
use tracing::{debug, warn};

/// Returns the handle for `handle["key"]`
pub fn key(handle: &RemoteHandle, key: &str) -> RemoteHandle {
    handle.subscript_literal(&encode_string(key))
}

/// Evaluates arbitrary source and decodes the result as `kind`
pub fn evaluate<C: ExecutionChannel + ?Sized>(
    channel: &mut C,
    source: &str,
    kind: &ValueKind,
    config: &BridgeConfig,
) -> BridgeResult<Value> {
    let response = round_trip(channel, source)?;
    Ok(decode(&response, kind, config)?)
}

/// Reads the value a handle points at
///
/// For [`ValueKind::Object`] nothing is sent: the result is the handle
/// itself, since the path is already known.
pub fn read_value<C: ExecutionChannel + ?Sized>(
    channel: &mut C,
    handle: &RemoteHandle,
    kind: &ValueKind,
    config: &BridgeConfig,
) -> BridgeResult<Value> {
    if *kind == ValueKind::Object {
        return Ok(Value::Handle(handle.clone()));
    }
    evaluate(channel, handle.accessor(), kind, config)
}

/// Reads `handle.field`
pub fn get_field<C: ExecutionChannel + ?Sized>(
    channel: &mut C,
    handle: &RemoteHandle,
    field: &str,
    kind: &ValueKind,
    config: &BridgeConfig,
) -> BridgeResult<Value> {
    let target = handle.child(field)?;
    read_value(channel, &target, kind, config)
}

/// Runs `handle.field = <value>`
pub fn set_field<C: ExecutionChannel + ?Sized>(
    channel: &mut C,
    handle: &RemoteHandle,
    field: &str,
    value: &Value,
    config: &BridgeConfig,
) -> BridgeResult<()> {
    let target = handle.child(field)?;
    let literal = encode(value, config)?;
    round_trip(channel, &format!("{} = {}", target.accessor(), literal))?;
    Ok(())
}

/// Calls `handle.method(args)` and decodes the result as `returns`
///
/// With `returns` set to [`ValueKind::Object`], the response text becomes
/// the accessor of a new handle (`None` decodes to [`Value::Null`]).
pub fn call_method<C: ExecutionChannel + ?Sized>(
    channel: &mut C,
    handle: &RemoteHandle,
    method: &str,
    positional: &[Value],
    keyword: &[(String, Value)],
    returns: &ValueKind,
    config: &BridgeConfig,
) -> BridgeResult<Value> {
    let source = call_source(handle, method, positional, keyword, config)?;
    evaluate(channel, &source, returns, config)
}

/// Calls a method that creates a host object and returns its handle
///
/// A `None` response is a decode failure: the call ran but produced no object.
pub fn call_constructor<C: ExecutionChannel + ?Sized>(
    channel: &mut C,
    handle: &RemoteHandle,
    method: &str,
    positional: &[Value],
    keyword: &[(String, Value)],
    config: &BridgeConfig,
) -> BridgeResult<RemoteHandle> {
    let source = call_source(handle, method, positional, keyword, config)?;
    let response = round_trip(channel, &source)?;
    Ok(decode_handle(&response)?)
}

fn call_source(
    handle: &RemoteHandle,
    method: &str,
    positional: &[Value],
    keyword: &[(String, Value)],
    config: &BridgeConfig,
) -> BridgeResult<String> {
    let target = handle.child(method)?;
    let args = encode_call_args(positional, keyword, config)?;
    Ok(format!("{}({})", target.accessor(), args))
}

fn round_trip<C: ExecutionChannel + ?Sized>(
    channel: &mut C,
    source: &str,
) -> Result<String, ChannelError> {
    debug!(target: "remote_proxy", source, "execute");
    match channel.execute(source) {
        Ok(response) => {
            debug!(target: "remote_proxy", %response, "response");
            Ok(response)
        }
        Err(err) => {
            warn!(target: "remote_proxy", source, error = %err, "request failed");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_types::{BridgeError, FunctionRef, UnencodableValueError};
    use sim_host::{EchoHost, RecordingChannel, ScriptedChannel};

    fn config() -> BridgeConfig {
        BridgeConfig::default()
    }

    #[test]
    fn test_get_field_request_text() {
        let mut channel = ScriptedChannel::new().with_value("\"Cube\"");
        let root = RemoteHandle::new("root.objects[0]");

        let name = get_field(&mut channel, &root, "name", &ValueKind::String, &config()).unwrap();
        assert_eq!(name, Value::String("Cube".to_string()));
        assert_eq!(channel.requests(), ["root.objects[0].name"]);
    }

    #[test]
    fn test_object_field_needs_no_round_trip() {
        let mut channel = ScriptedChannel::new();
        let root = RemoteHandle::new("scene");

        let camera = get_field(&mut channel, &root, "camera", &ValueKind::Object, &config()).unwrap();
        assert_eq!(camera, Value::Handle(RemoteHandle::new("scene.camera")));
        assert!(channel.requests().is_empty());
    }

    #[test]
    fn test_set_field() {
        let mut channel = ScriptedChannel::new().with_value("None");
        let root = RemoteHandle::new("scene.render");

        set_field(
            &mut channel,
            &root,
            "filepath",
            &Value::from("out\"; rm"),
            &config(),
        )
        .unwrap();
        assert_eq!(channel.requests(), ["scene.render.filepath = \"out\\\"; rm\""]);
    }

    #[test]
    fn test_call_method_with_keywords() {
        let mut channel = ScriptedChannel::new().with_value("[1.0, 2.5]");
        let root = RemoteHandle::new("obj");

        let result = call_method(
            &mut channel,
            &root,
            "bounds",
            &[Value::from(2)],
            &[("world".to_string(), Value::Boolean(true))],
            &ValueKind::array_of(ValueKind::Float),
            &config(),
        )
        .unwrap();
        assert_eq!(
            result,
            Value::Array(vec![Value::Float(1.0), Value::Float(2.5)])
        );
        assert_eq!(channel.requests(), ["obj.bounds(2, world=True)"]);
    }

    #[test]
    fn test_call_constructor_wraps_response() {
        let mut host =
            EchoHost::new().with_binding("data.meshes.new(\"m\")", "data.meshes[\"m\"]\n");
        let data = RemoteHandle::new("data");
        let meshes = data.child("meshes").unwrap();

        let mesh = call_constructor(&mut host, &meshes, "new", &[Value::from("m")], &[], &config())
            .unwrap();
        assert_eq!(mesh.accessor(), "data.meshes[\"m\"]");
    }

    #[test]
    fn test_call_constructor_rejects_none() {
        let mut channel = ScriptedChannel::new().with_value("None");
        let meshes = RemoteHandle::new("data.meshes");

        let err = call_constructor(&mut channel, &meshes, "new", &[Value::from("m")], &[], &config())
            .unwrap_err();
        assert!(matches!(err, BridgeError::Undecodable(_)));
        assert!(err.is_partial());
        assert_eq!(channel.requests(), ["data.meshes.new(\"m\")"]);
    }

    #[test]
    fn test_function_argument_never_sent() {
        let mut channel = RecordingChannel::new(EchoHost::new());
        let root = RemoteHandle::new("ui");
        let callback = Value::Function(FunctionRef::new("on_click"));

        let err = call_method(
            &mut channel,
            &root,
            "bind",
            &[callback],
            &[],
            &ValueKind::Null,
            &config(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Unencodable(UnencodableValueError::Function { .. })
        ));
        assert_eq!(channel.call_count(), 0);
    }

    #[test]
    fn test_decode_failure_is_partial() {
        let mut channel = ScriptedChannel::new().with_value("Tru");
        let err = evaluate(&mut channel, "flag", &ValueKind::Boolean, &config()).unwrap_err();
        assert!(err.is_partial());
    }

    #[test]
    fn test_remote_fault_is_not_partial() {
        let mut channel = ScriptedChannel::new().with_fault("AttributeError", "no attr");
        let root = RemoteHandle::new("obj");
        let err = get_field(&mut channel, &root, "nope", &ValueKind::Integer, &config()).unwrap_err();
        match err {
            BridgeError::Remote(fault) => {
                assert_eq!(fault.kind, "AttributeError");
                assert_eq!(fault.request, "obj.nope");
            }
            other => panic!("expected remote fault, got {:?}", other),
        }
    }

    #[test]
    fn test_key_is_quoted() {
        let root = RemoteHandle::new("data.objects");
        assert_eq!(key(&root, "a\"]").accessor(), "data.objects[\"a\\\"]\"]");
    }

    #[test]
    fn test_injected_method_name_rejected() {
        let mut channel = ScriptedChannel::new();
        let root = RemoteHandle::new("obj");
        let err = call_method(
            &mut channel,
            &root,
            "x(); evil",
            &[],
            &[],
            &ValueKind::Null,
            &config(),
        )
        .unwrap_err();
        assert!(err.is_before_send());
        assert!(channel.requests().is_empty());
    }
}
