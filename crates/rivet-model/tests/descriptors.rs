mod common;

use common::runtime;
use rivet_model::{
    accessibility::Accessibility,
    descriptor::{BaseType, MemberDescriptor, TypeDescriptor},
    source::{Capability, MemberKind, TypeDecl},
};

#[test]
fn public_sealed_type_without_constructors() {
    let mut rt = runtime();
    let ty = rt.source.declare(
        TypeDecl::class("Order")
            .in_namespace("Acme.Sales")
            .sealed()
            .base(rt.object),
    );

    let desc = TypeDescriptor::build(&rt.source, &rt.library, ty, Vec::new())
        .expect("plain type should build");

    assert_eq!(desc.accessibility(), Accessibility::Public);
    assert!(desc.is_sealed());
    assert!(!desc.is_generic());
    assert!(desc.type_parameters().is_empty());
    assert!(desc.is_empty_constructable());
    assert!(!desc.use_activator());
    assert!(desc.track_references());
    assert!(!desc.is_immutable());
    assert!(!desc.omit_default_member_values());
    assert_eq!(desc.base_type(), BaseType::Declared(rt.object));
    assert!(!desc.has_complex_base_type());
    assert_eq!(desc.name(), "Order");
    assert_eq!(desc.namespace(), "Acme.Sales");
    assert_eq!(desc.generated_namespace(), "RivetGenerated.Acme.Sales");
    assert_eq!(desc.type_syntax(), "Acme.Sales.Order");
}

#[test]
fn enum_type_reports_underlying_representation() {
    let mut rt = runtime();
    let ty = rt
        .source
        .declare(TypeDecl::enumeration("Status", rt.int32).in_namespace("Acme"));

    let desc = TypeDescriptor::build(&rt.source, &rt.library, ty, Vec::new())
        .expect("enum should build");

    assert!(desc.is_enum());
    assert_eq!(desc.base_type(), BaseType::EnumUnderlying(rt.int32));
    assert_eq!(desc.base_type().handle(), Some(rt.int32));
    assert!(desc.is_immutable());
    assert!(desc.is_value_type());
    assert!(!desc.track_references());
}

#[test]
fn value_type_never_tracks_references() {
    let mut rt = runtime();
    let ty = rt.source.declare(
        TypeDecl::value_type("Point")
            .capability(Capability::Immutable)
            .capability(Capability::UseActivator),
    );

    let desc = TypeDescriptor::build(&rt.source, &rt.library, ty, Vec::new())
        .expect("value type should build");

    assert!(!desc.track_references());
    assert!(desc.is_immutable());
    assert!(desc.use_activator());
}

#[test]
fn private_zero_argument_constructor_needs_activator() {
    let mut rt = runtime();
    let ty = rt.source.declare(
        TypeDecl::class("Ledger")
            .constructor(Accessibility::Private, 0)
            .constructor(Accessibility::Public, 2),
    );

    let desc = TypeDescriptor::build(&rt.source, &rt.library, ty, Vec::new())
        .expect("type should build");

    assert!(!desc.is_empty_constructable());
    assert!(desc.use_activator());
}

#[test]
fn nested_type_takes_most_restrictive_accessibility() {
    let mut rt = runtime();
    let outer = rt.source.declare(
        TypeDecl::class("Outer")
            .in_namespace("Acme")
            .accessibility(Accessibility::Internal),
    );
    let inner = rt.source.declare(
        TypeDecl::class("Inner")
            .nested_in(outer)
            .accessibility(Accessibility::Public)
            .partial(),
    );

    let desc = TypeDescriptor::build(&rt.source, &rt.library, inner, Vec::new())
        .expect("nested type should build");

    assert_eq!(desc.accessibility(), Accessibility::Internal);
    assert!(desc.is_partial());
    assert_eq!(desc.namespace(), "Acme.Outer");
    assert_eq!(desc.generated_namespace(), "RivetGenerated.Acme.Outer");
}

#[test]
fn global_type_uses_bare_namespace_root() {
    let mut rt = runtime();
    let ty = rt.source.declare(TypeDecl::class("Loose"));

    let desc = TypeDescriptor::build(&rt.source, &rt.library, ty, Vec::new())
        .expect("type should build");

    assert_eq!(desc.namespace(), "");
    assert_eq!(desc.generated_namespace(), "RivetGenerated");
}

#[test]
fn members_are_stored_in_given_order() {
    let mut rt = runtime();
    let ty = rt.source.declare(TypeDecl::class("Order"));
    let total = rt
        .source
        .declare_member(ty, "Total", MemberKind::Field { ty: rt.int32 });
    let count = rt
        .source
        .declare_member(ty, "Count", MemberKind::Property { ty: rt.int32 });
    let members = vec![
        MemberDescriptor {
            name: "Total".to_string(),
            member: total,
            ty: rt.int32,
            field_id: 1,
        },
        MemberDescriptor {
            name: "Count".to_string(),
            member: count,
            ty: rt.int32,
            field_id: 0,
        },
    ];

    let desc = TypeDescriptor::build(&rt.source, &rt.library, ty, members.clone())
        .expect("type should build");

    assert_eq!(desc.members(), members.as_slice());
}

#[test]
fn omit_defaults_marker_is_surfaced() {
    let mut rt = runtime();
    let ty = rt.source.declare(
        TypeDecl::class("Sparse").capability(Capability::OmitDefaultMemberValues),
    );

    let desc = TypeDescriptor::build(&rt.source, &rt.library, ty, Vec::new())
        .expect("type should build");

    assert!(desc.omit_default_member_values());
}

#[test]
fn descriptor_serializes_for_dumps() {
    let mut rt = runtime();
    let ty = rt
        .source
        .declare(TypeDecl::class("Box").in_namespace("Acme").type_parameter("T"));

    let desc = TypeDescriptor::build(&rt.source, &rt.library, ty, Vec::new())
        .expect("type should build");
    let json = serde_json::to_value(&desc).expect("descriptor should serialize");

    assert_eq!(json["type_syntax"], "Acme.Box<T>");
    assert_eq!(json["accessibility"], "Public");
    assert_eq!(json["type_parameters"][0][0], "T");
    assert_eq!(json["track_references"], true);
}
