//! Headless page model: body elements, named containers, event listeners and a
//! deferred-task queue. Everything the viewers mutate goes through here.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
}

/// What a listener is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    Document,
    Element(ElementId),
    /// A node inside a container's markup, addressed by its DOM id.
    Node(String),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    pub class_name: String,
    pub inner_html: String,
    classes: BTreeSet<String>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

#[derive(Debug, Clone)]
struct Listener {
    event: EventKind,
    target: ListenerTarget,
}

#[derive(Debug, Default)]
pub struct Document {
    next_id: u64,
    body: Vec<Element>,
    containers: HashMap<String, String>,
    listeners: BTreeMap<ListenerId, Listener>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Replace a container's contents. Listeners bound to nodes inside it are dropped.
    pub fn set_inner_html(&mut self, container: &str, html: String) {
        let prefix = format!("{}/", container);
        self.listeners.retain(|_, l| match &l.target {
            ListenerTarget::Node(node) => !node.starts_with(&prefix),
            _ => true,
        });
        self.containers.insert(container.to_string(), html);
    }

    pub fn inner_html(&self, container: &str) -> Option<&str> {
        self.containers.get(container).map(String::as_str)
    }

    pub fn append_to_body(&mut self, class_name: &str, inner_html: String) -> ElementId {
        let id = ElementId(self.next());
        self.body.push(Element {
            id,
            class_name: class_name.to_string(),
            inner_html,
            classes: BTreeSet::new(),
        });
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.body.iter().find(|e| e.id == id)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.body.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) -> bool {
        match self.element_mut(id) {
            Some(el) => el.classes.insert(class.to_string()),
            None => false,
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) -> bool {
        match self.element_mut(id) {
            Some(el) => el.classes.remove(class),
            None => false,
        }
    }

    /// Detach an element and every listener bound to it.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let pos = self.body.iter().position(|e| e.id == id)?;
        self.listeners
            .retain(|_, l| l.target != ListenerTarget::Element(id));
        Some(self.body.remove(pos))
    }

    pub fn body(&self) -> &[Element] {
        &self.body
    }

    pub fn add_listener(&mut self, event: EventKind, target: ListenerTarget) -> ListenerId {
        let id = ListenerId(self.next());
        self.listeners.insert(id, Listener { event, target });
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    pub fn listener_count(&self, event: EventKind) -> usize {
        self.listeners.values().filter(|l| l.event == event).count()
    }

    pub fn listeners_on(&self, event: EventKind, target: &ListenerTarget) -> usize {
        self.listeners
            .values()
            .filter(|l| l.event == event && &l.target == target)
            .count()
    }
}

/// Deferred tasks ordered by due time, then by scheduling order.
#[derive(Debug)]
pub struct Timers<T> {
    seq: u64,
    queue: Vec<(DateTime<Utc>, u64, T)>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            seq: 0,
            queue: Vec::new(),
        }
    }
}

impl<T> Timers<T> {
    pub fn schedule(&mut self, due: DateTime<Utc>, task: T) {
        self.seq += 1;
        self.queue.push((due, self.seq, task));
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|(at, _, _)| *at <= now);
        self.queue = pending;
        due.sort_by_key(|(at, seq, _)| (*at, *seq));
        due.into_iter().map(|(_, _, task)| task).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
