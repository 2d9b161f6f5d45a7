use warrant_shared::{names, Ownership, Permission, PermissionSet};

use crate::server::ServerConfig;

// The guest table: owners may edit their own replicas, nobody else's.

struct ComponentRules {
    component_type: &'static str,
    /// (property, allowed on components created by someone else)
    properties: &'static [(&'static str, bool)],
    resource_list: bool,
}

struct PluginRules {
    plugin_type: &'static str,
    allowed: bool,
    properties: &'static [&'static str],
}

const COMPONENTS: &[ComponentRules] = &[
    ComponentRules {
        component_type: "SceneNode",
        properties: &[],
        resource_list: false,
    },
    ComponentRules {
        component_type: "Entity",
        properties: &[("Material", false), ("CastShadows", false), ("Visible", false)],
        resource_list: false,
    },
    ComponentRules {
        component_type: "Camera",
        properties: &[],
        resource_list: true,
    },
    ComponentRules {
        component_type: "Animation",
        properties: &[
            ("AnimationName", false),
            ("Speed", false),
            ("Enabled", false),
            ("Loop", false),
            ("Position", false),
            ("Length", false),
            ("AutoLength", false),
            ("Weight", false),
        ],
        resource_list: true,
    },
    ComponentRules {
        component_type: "Text",
        properties: &[("Caption", false), ("Colour", false)],
        resource_list: true,
    },
    ComponentRules {
        component_type: "RigidBody",
        properties: &[
            ("PhysicsType", false),
            ("Mass", false),
            ("Friction", false),
            ("Restitution", false),
            ("LinearDampening", false),
            ("AngularDampening", false),
            ("LinearSleepingThreshold", false),
            ("AngularSleepingThreshold", false),
            ("AddToWorld", false),
        ],
        resource_list: true,
    },
    ComponentRules {
        component_type: "CollisionShape",
        properties: &[
            ("ShapeType", false),
            ("CollisionFile", false),
            ("ShapeParameters", false),
        ],
        resource_list: false,
    },
    ComponentRules {
        component_type: "Audio",
        properties: &[
            ("File", false),
            ("Volume", true),
            ("VolumeSmooth", false),
            ("VolumeSmoothTimescale", false),
            ("Loop", false),
            ("AutoPlay", false),
        ],
        resource_list: true,
    },
    ComponentRules {
        component_type: "LuaObjectScript",
        properties: &[
            ("ClientScriptFile", false),
            ("ClientEnvironmentName", false),
            ("ClientSecurityLevel", false),
            ("ServerScriptFile", false),
            ("ServerEnvironmentName", false),
            ("ServerSecurityLevel", false),
        ],
        resource_list: true,
    },
    ComponentRules {
        component_type: "Particle",
        properties: &[
            ("Name", false),
            ("Quota", false),
            ("Enabled", false),
            ("Speed", false),
        ],
        resource_list: true,
    },
    ComponentRules {
        component_type: "Mesh",
        properties: &[
            ("MeshFile", false),
            ("ShapeType", false),
            ("ShapeParameters", false),
        ],
        resource_list: true,
    },
];

const PLUGINS: &[PluginRules] = &[
    PluginRules {
        plugin_type: "ServerNeighbors",
        allowed: false,
        properties: &["ServerNeighbors"],
    },
    PluginRules {
        plugin_type: "Sky",
        allowed: true,
        properties: &[
            "Timescale",
            "FogDensity",
            "FogColour",
            "ObserverLongitude",
            "ObserverLatitude",
            "CloudSpeed",
            "CloudBlendTime",
            "CloudCoverage",
            "CloudHeight",
            "PrecipitationType",
            "PrecipitationIntensity",
            "PrecipitationSpeed",
            "PrecipitationCameraSpeedScale",
            "SunAmbientMultiplier",
            "SunSpecularMultiplier",
            "SunDiffuseMultiplier",
        ],
    },
    PluginRules {
        plugin_type: "GameMode",
        allowed: false,
        properties: &[
            "ClientLoadDefaultGamemode",
            "ClientScriptFiles",
            "ClientSecurityLevel",
            "ServerScriptFiles",
            "ServerSecurityLevel",
        ],
    },
    PluginRules {
        plugin_type: "Terrain",
        allowed: false,
        properties: &[
            "TerrainType",
            "HeightmapType",
            "ClientHeightmapFile",
            "ServerHeightmapFile",
            "InputScale",
            "HeightOffset",
            "LayerInstances",
            "MinHeight0",
            "FadeDistance0",
            "MinHeight1",
            "FadeDistance1",
        ],
    },
    PluginRules {
        plugin_type: "ResourceManager",
        allowed: false,
        properties: &["ResourceServer"],
    },
];

const RESOURCE_LIST: &str = "ResourceList";

fn set(permissions: &mut PermissionSet, name: &str, allowed: bool) {
    permissions.upsert(Permission::new(name, allowed));
}

/// Writes the default guest table into `permissions`, updating entries that
/// already exist.
pub(crate) fn install(permissions: &mut PermissionSet, config: &ServerConfig) {
    use Ownership::{Other, Own};

    // Objects
    permissions.upsert(
        Permission::new(names::CREATE_REMOTE_OBJECT, true).with_max_items(config.max_remote_objects),
    );
    set(permissions, names::CREATE_LOCAL_OBJECT, true);
    set(permissions, names::DESTROY_OWN_OBJECT, true);
    set(permissions, names::DESTROY_LOCAL_OBJECT, true);
    set(permissions, names::DESTROY_OTHER_OBJECT, false);
    set(permissions, &names::unparent(Own), true);
    set(permissions, &names::unparent(Other), false);
    set(permissions, &names::set_parent(Own, Own), true);
    set(permissions, &names::set_parent(Other, Own), false);
    set(permissions, &names::set_parent(Own, Other), false);
    set(permissions, &names::set_parent(Other, Other), false);

    // Components
    permissions.upsert(
        Permission::new(names::CREATE_REMOTE_COMPONENT, true)
            .with_max_items(config.max_remote_components),
    );
    set(permissions, &names::create_remote_component_on(Own), true);
    set(permissions, &names::create_remote_component_on(Other), false);
    set(permissions, names::CREATE_LOCAL_COMPONENT, true);
    set(permissions, &names::destroy_component(Own, Own), true);
    set(permissions, &names::destroy_component(Own, Other), false);
    set(permissions, &names::destroy_component(Other, Own), false);
    set(permissions, &names::destroy_component(Other, Other), false);
    set(permissions, names::DESTROY_LOCAL_COMPONENT, true);

    for rules in COMPONENTS {
        let component_type = rules.component_type;
        set(permissions, &names::create_component(component_type), true);
        for (property, other_allowed) in rules.properties {
            set(
                permissions,
                &names::set_property(Own, component_type, property),
                true,
            );
            set(
                permissions,
                &names::set_property(Other, component_type, property),
                *other_allowed,
            );
        }
        if rules.resource_list {
            set(
                permissions,
                &names::insert_value(Own, component_type, RESOURCE_LIST),
                true,
            );
            set(
                permissions,
                &names::insert_value(Other, component_type, RESOURCE_LIST),
                false,
            );
        }
    }

    // Plugins
    for rules in PLUGINS {
        for property in rules.properties {
            set(
                permissions,
                &names::plugin_property(rules.plugin_type, property),
                rules.allowed,
            );
        }
    }
}
