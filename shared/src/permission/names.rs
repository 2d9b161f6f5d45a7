//! Permission names shared by the server authority hooks, the default
//! permission table and clients.
//!
//! The names are the protocol: a component or property without a matching
//! table entry is denied with `ItemNotFound`.

pub const CREATE_REMOTE_OBJECT: &str = "ObjectManager_CreateRemoteObject";
pub const CREATE_LOCAL_OBJECT: &str = "ObjectManager_CreateLocalObject";
pub const DESTROY_OWN_OBJECT: &str = "ObjectManager_DestroyOwnObject";
pub const DESTROY_OTHER_OBJECT: &str = "ObjectManager_DestroyOtherObject";
pub const DESTROY_LOCAL_OBJECT: &str = "ObjectManager_DestroyLocalObject";

pub const CREATE_REMOTE_COMPONENT: &str = "ObjectManager_CreateRemoteComponent";
pub const CREATE_LOCAL_COMPONENT: &str = "ObjectManager_CreateLocalComponent";
pub const DESTROY_LOCAL_COMPONENT: &str = "ObjectManager_DestroyLocalComponent";

/// Whether the acting connection created the entity in question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Ownership {
    Own,
    Other,
}

impl Ownership {
    pub fn of(is_own: bool) -> Self {
        if is_own {
            Ownership::Own
        } else {
            Ownership::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Ownership::Own => "Own",
            Ownership::Other => "Other",
        }
    }
}

/// `ObjectManager_CreateRemoteComponentOn<Own|Other>Object`
pub fn create_remote_component_on(object: Ownership) -> String {
    format!("ObjectManager_CreateRemoteComponentOn{}Object", object.as_str())
}

/// `<ComponentType>_Create`
pub fn create_component(component_type: &str) -> String {
    format!("{}_Create", component_type)
}

/// `ObjectManager_Destroy<Own|Other>ComponentOn<Own|Other>Object`
pub fn destroy_component(component: Ownership, object: Ownership) -> String {
    format!(
        "ObjectManager_Destroy{}ComponentOn{}Object",
        component.as_str(),
        object.as_str()
    )
}

pub fn destroy_object(object: Ownership) -> &'static str {
    match object {
        Ownership::Own => DESTROY_OWN_OBJECT,
        Ownership::Other => DESTROY_OTHER_OBJECT,
    }
}

/// `Object_UnparentOn<Own|Other>Object`
pub fn unparent(object: Ownership) -> String {
    format!("Object_UnparentOn{}Object", object.as_str())
}

/// `Object_Set<Own|Other>ParentOn<Own|Other>Object`
pub fn set_parent(parent: Ownership, object: Ownership) -> String {
    format!(
        "Object_Set{}ParentOn{}Object",
        parent.as_str(),
        object.as_str()
    )
}

/// `SetPropertyOn<Own|Other><ComponentType>Component_<Property>`
pub fn set_property(component: Ownership, component_type: &str, property: &str) -> String {
    format!(
        "SetPropertyOn{}{}Component_{}",
        component.as_str(),
        component_type,
        strip_array_identifiers(property)
    )
}

/// `InsertValueIn<Own|Other><ComponentType>Component_<Property>`
pub fn insert_value(component: Ownership, component_type: &str, property: &str) -> String {
    format!(
        "InsertValueIn{}{}Component_{}",
        component.as_str(),
        component_type,
        strip_array_identifiers(property)
    )
}

/// `SetPropertyOn<Plugin>Plugin_<Property>`
pub fn plugin_property(plugin_type: &str, property: &str) -> String {
    format!(
        "SetPropertyOn{}Plugin_{}",
        plugin_type,
        strip_array_identifiers(property)
    )
}

/// Removes every `[...]` index from a property query, so `ResourceList[3]`
/// and `ResourceList` share one permission.
pub fn strip_array_identifiers(query: &str) -> String {
    let mut output = String::with_capacity(query.len());
    let mut depth = 0_usize;
    for character in query.chars() {
        match character {
            '[' => depth += 1,
            ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => output.push(character),
            _ => {}
        }
    }
    output
}
