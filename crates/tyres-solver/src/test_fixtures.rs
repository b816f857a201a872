//! A small declared domain model shared by the solver tests.
//!
//! ```text
//! class String, class Number, class Integer extends Number, class Boolean
//! class ArrayList<E> implements List<E>
//! class HashMap<K, V> implements Map<K, V>
//! class StringList extends ArrayList<String>
//! class CustomerMap extends HashMap<String, Customer>
//! class SwappedMap<A, B> extends HashMap<B, A>
//! class Pair<K, V> { K first; V second; }
//!
//! interface Named { String getDisplayName(); }
//! interface Identifiable<ID> { ID getId(); }
//! class Address { String street; String city; }
//! class Customer implements Named, Identifiable<Integer> {
//!     String name; Address address; List<Order> orders; String[] tags;
//!     Customer referrer; Map<String, Integer> attributes; Optional<String> nickname;
//!     String getEmail(); void setPhone(String); Boolean isActive();
//!     Customer(String name, Address address);
//! }
//! class Order { Customer customer; Number total; List<String> items; }
//!
//! interface Repository<T> { T findOne(); void save(T); List<T> findAll(); }
//! class CustomerRepository implements Repository<Customer>
//! abstract class AbstractRepository<T> implements Repository<T> { List<T> cache; }
//! class OrderRepository extends AbstractRepository<Order>
//!
//! class Node<T extends Node<T>> { T parent; List<T> children; Node<T> self; }
//! class TreeNode extends Node<TreeNode>
//!
//! class Wrapper<T> {
//!     T value; List<T> items; T[] array; Map<String, T> lookup;
//!     Optional<T> maybe; List<? extends T> bounded; Wrapper<T> next;
//! }
//! class Bounded<N extends Number> { N value; }
//! ```

use crate::bindings::BindingMap;
use crate::registry::{ClassRegistry, WellKnownTypes};
use crate::resolver::TypeResolver;
use crate::type_info::TypeInfo;
use crate::types::{ClassId, RawType, TypeDescriptor, TypeVarId};
use std::sync::Arc;

pub(crate) fn class(id: ClassId) -> TypeDescriptor {
    TypeDescriptor::class(id)
}

pub(crate) fn var(id: TypeVarId) -> TypeDescriptor {
    TypeDescriptor::variable(id)
}

pub(crate) fn generic(raw: ClassId, args: impl IntoIterator<Item = TypeDescriptor>) -> TypeDescriptor {
    TypeDescriptor::parametrized(raw, args)
}

pub(crate) fn raw(id: ClassId) -> RawType {
    RawType::Class(id)
}

pub(crate) struct Fixture {
    pub registry: Arc<ClassRegistry>,
    pub resolver: TypeResolver,
    pub wk: WellKnownTypes,

    pub string: ClassId,
    pub number: ClassId,
    pub integer: ClassId,
    pub boolean: ClassId,

    pub array_list: ClassId,
    pub hash_map: ClassId,
    pub string_list: ClassId,
    pub customer_map: ClassId,
    pub swapped_map: ClassId,
    pub pair: ClassId,
    pub pair_k: TypeVarId,
    pub pair_v: TypeVarId,

    pub named: ClassId,
    pub identifiable: ClassId,
    pub address: ClassId,
    pub customer: ClassId,
    pub order: ClassId,

    pub repository: ClassId,
    pub repository_t: TypeVarId,
    pub customer_repository: ClassId,
    pub abstract_repository: ClassId,
    pub order_repository: ClassId,

    pub node: ClassId,
    pub node_t: TypeVarId,
    pub tree_node: ClassId,

    pub wrapper: ClassId,
    pub wrapper_t: TypeVarId,
    pub bounded: ClassId,
    pub bounded_n: TypeVarId,
}

impl Fixture {
    pub fn new() -> Self {
        let registry = Arc::new(ClassRegistry::new());
        let wk = *registry.well_known();
        let r = &registry;

        let string = r.declare_class("String");
        let number = r.declare_class("Number");
        let integer = r.declare_class("Integer");
        r.set_superclass(integer, class(number));
        let boolean = r.declare_class("Boolean");

        let array_list = r.declare_class("ArrayList");
        let array_list_e = r.add_type_param(array_list, "E", vec![]);
        r.add_interface(array_list, generic(wk.list, [var(array_list_e)]));

        let hash_map = r.declare_class("HashMap");
        let hash_map_k = r.add_type_param(hash_map, "K", vec![]);
        let hash_map_v = r.add_type_param(hash_map, "V", vec![]);
        r.add_interface(hash_map, generic(wk.map, [var(hash_map_k), var(hash_map_v)]));

        let string_list = r.declare_class("StringList");
        r.set_superclass(string_list, generic(array_list, [class(string)]));

        let address = r.declare_class("Address");
        r.add_field(address, "street", class(string));
        r.add_field(address, "city", class(string));

        let named = r.declare_interface("Named");
        r.add_method(named, "getDisplayName", vec![], Some(class(string)));

        let identifiable = r.declare_interface("Identifiable");
        let identifiable_id = r.add_type_param(identifiable, "ID", vec![]);
        r.add_method(identifiable, "getId", vec![], Some(var(identifiable_id)));

        let customer = r.declare_class("Customer");
        let order = r.declare_class("Order");
        r.add_interface(customer, class(named));
        r.add_interface(customer, generic(identifiable, [class(integer)]));
        r.add_field(customer, "name", class(string));
        r.add_field(customer, "address", class(address));
        r.add_field(customer, "orders", generic(wk.list, [class(order)]));
        r.add_field(customer, "tags", TypeDescriptor::nominal(RawType::array_of(raw(string))));
        r.add_field(customer, "referrer", class(customer));
        r.add_field(
            customer,
            "attributes",
            generic(wk.map, [class(string), class(integer)]),
        );
        r.add_field(customer, "nickname", generic(wk.optional, [class(string)]));
        r.add_method(customer, "getEmail", vec![], Some(class(string)));
        r.add_method(customer, "setPhone", vec![class(string)], None);
        r.add_method(customer, "isActive", vec![], Some(class(boolean)));
        r.add_constructor(customer, vec![class(string), class(address)]);

        r.add_field(order, "customer", class(customer));
        r.add_field(order, "total", class(number));
        r.add_field(order, "items", generic(wk.list, [class(string)]));

        let customer_map = r.declare_class("CustomerMap");
        r.set_superclass(customer_map, generic(hash_map, [class(string), class(customer)]));

        let swapped_map = r.declare_class("SwappedMap");
        let swapped_a = r.add_type_param(swapped_map, "A", vec![]);
        let swapped_b = r.add_type_param(swapped_map, "B", vec![]);
        r.set_superclass(swapped_map, generic(hash_map, [var(swapped_b), var(swapped_a)]));

        let pair = r.declare_class("Pair");
        let pair_k = r.add_type_param(pair, "K", vec![]);
        let pair_v = r.add_type_param(pair, "V", vec![]);
        r.add_field(pair, "first", var(pair_k));
        r.add_field(pair, "second", var(pair_v));

        let repository = r.declare_interface("Repository");
        let repository_t = r.add_type_param(repository, "T", vec![]);
        r.add_method(repository, "findOne", vec![], Some(var(repository_t)));
        r.add_method(repository, "save", vec![var(repository_t)], None);
        r.add_method(repository, "findAll", vec![], Some(generic(wk.list, [var(repository_t)])));

        let customer_repository = r.declare_class("CustomerRepository");
        r.add_interface(customer_repository, generic(repository, [class(customer)]));

        let abstract_repository = r.declare(
            "AbstractRepository",
            crate::registry::ClassFlags::ABSTRACT,
        );
        let abstract_t = r.add_type_param(abstract_repository, "T", vec![]);
        r.add_interface(abstract_repository, generic(repository, [var(abstract_t)]));
        r.add_field(abstract_repository, "cache", generic(wk.list, [var(abstract_t)]));

        let order_repository = r.declare_class("OrderRepository");
        r.set_superclass(order_repository, generic(abstract_repository, [class(order)]));

        let node = r.declare_class("Node");
        let node_t = r.add_type_param(node, "T", vec![]);
        r.set_type_param_bounds(node_t, vec![generic(node, [var(node_t)])]);
        r.add_field(node, "parent", var(node_t));
        r.add_field(node, "children", generic(wk.list, [var(node_t)]));
        r.add_field(node, "self", generic(node, [var(node_t)]));

        let tree_node = r.declare_class("TreeNode");
        r.set_superclass(tree_node, generic(node, [class(tree_node)]));

        let wrapper = r.declare_class("Wrapper");
        let wrapper_t = r.add_type_param(wrapper, "T", vec![]);
        r.add_field(wrapper, "value", var(wrapper_t));
        r.add_field(wrapper, "items", generic(wk.list, [var(wrapper_t)]));
        r.add_field(wrapper, "array", TypeDescriptor::array(var(wrapper_t)));
        r.add_field(wrapper, "lookup", generic(wk.map, [class(string), var(wrapper_t)]));
        r.add_field(wrapper, "maybe", generic(wk.optional, [var(wrapper_t)]));
        r.add_field(
            wrapper,
            "bounded",
            generic(wk.list, [TypeDescriptor::wildcard_extends(var(wrapper_t))]),
        );
        r.add_field(wrapper, "next", generic(wrapper, [var(wrapper_t)]));

        let bounded = r.declare_class("Bounded");
        let bounded_n = r.add_type_param(bounded, "N", vec![class(number)]);
        r.add_field(bounded, "value", var(bounded_n));

        let resolver = TypeResolver::for_registry(registry.clone());

        Self {
            registry,
            resolver,
            wk,
            string,
            number,
            integer,
            boolean,
            array_list,
            hash_map,
            string_list,
            customer_map,
            swapped_map,
            pair,
            pair_k,
            pair_v,
            named,
            identifiable,
            address,
            customer,
            order,
            repository,
            repository_t,
            customer_repository,
            abstract_repository,
            order_repository,
            node,
            node_t,
            tree_node,
            wrapper,
            wrapper_t,
            bounded,
            bounded_n,
        }
    }

    /// Resolve a descriptor with no outer bindings.
    pub fn resolve(&self, descriptor: TypeDescriptor) -> TypeInfo {
        self.resolver
            .resolve(&descriptor, &BindingMap::new())
            .expect("fixture descriptor resolves")
    }

    pub fn class_info(&self, id: ClassId) -> TypeInfo {
        self.resolve(class(id))
    }

    /// A fresh resolver over the same declarations.
    pub fn fresh_resolver(&self) -> TypeResolver {
        TypeResolver::for_registry(self.registry.clone())
    }
}
