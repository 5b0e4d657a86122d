//! `ToDos` plugin - an in-memory task list

use super::lock;
use callgate_domain::{
    FunctionDescriptor, InvocationError, ParamKind, ParameterSpec, Plugin, PluginFunction,
};
use std::sync::{Arc, Mutex};

pub const PLUGIN_NAME: &str = "ToDos";

const PRIORITIES: [&str; 3] = ["low", "normal", "high"];

#[derive(Debug, Clone)]
struct Todo {
    id: u64,
    description: String,
    priority: String,
    completed: bool,
}

#[derive(Debug, Default)]
struct TodoStore {
    next_id: u64,
    todos: Vec<Todo>,
}

impl TodoStore {
    fn position(&self, raw_id: &str) -> Result<usize, InvocationError> {
        let id: u64 = raw_id
            .trim()
            .parse()
            .map_err(|_| InvocationError::new(format!("Invalid todo id '{}'", raw_id)))?;
        self.todos
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| InvocationError::new(format!("No todo with id {}", id)))
    }
}

/// Task list exposing create / complete / delete / list
pub struct TodosPlugin {
    functions: Vec<PluginFunction>,
}

impl TodosPlugin {
    pub fn new() -> Self {
        let store = Arc::new(Mutex::new(TodoStore::default()));
        Self {
            functions: vec![
                create_todo(store.clone()),
                complete_todo(store.clone()),
                delete_todo(store.clone()),
                list_todos(store),
            ],
        }
    }
}

impl Default for TodosPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for TodosPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn description(&self) -> &str {
        "Manage a simple to-do list"
    }

    fn functions(&self) -> &[PluginFunction] {
        &self.functions
    }
}

fn create_todo(store: Arc<Mutex<TodoStore>>) -> PluginFunction {
    let descriptor = FunctionDescriptor::new("create_todo", "Add a new item to the to-do list")
        .with_parameter(ParameterSpec::text("description").with_description("What needs doing"))
        .with_parameter(
            ParameterSpec::new("priority", ParamKind::enumeration(PRIORITIES))
                .with_default("normal"),
        );

    PluginFunction::sync(descriptor, move |args| {
        let description = args.text("description")?.trim().to_string();
        if description.is_empty() {
            return Err(InvocationError::new("A todo needs a description"));
        }
        let priority = args.text("priority")?.to_string();

        let mut store = lock(&store)?;
        store.next_id += 1;
        let id = store.next_id;
        store.todos.push(Todo {
            id,
            description: description.clone(),
            priority: priority.clone(),
            completed: false,
        });
        Ok(format!("Created todo {}: {} ({})", id, description, priority))
    })
}

fn complete_todo(store: Arc<Mutex<TodoStore>>) -> PluginFunction {
    let descriptor = FunctionDescriptor::new("complete_todo", "Mark a to-do item as done")
        .with_parameter(ParameterSpec::text("todoId"));

    PluginFunction::sync(descriptor, move |args| {
        let mut store = lock(&store)?;
        let index = store.position(args.text("todoId")?)?;
        let todo = &mut store.todos[index];
        if todo.completed {
            return Ok(format!("Todo {} was already completed", todo.id));
        }
        todo.completed = true;
        Ok(format!("Completed todo {}: {}", todo.id, todo.description))
    })
}

fn delete_todo(store: Arc<Mutex<TodoStore>>) -> PluginFunction {
    let descriptor = FunctionDescriptor::new("delete_todo", "Remove a to-do item")
        .with_parameter(ParameterSpec::text("todoId"));

    PluginFunction::sync(descriptor, move |args| {
        let mut store = lock(&store)?;
        let index = store.position(args.text("todoId")?)?;
        let todo = store.todos.remove(index);
        Ok(format!("Deleted todo {}: {}", todo.id, todo.description))
    })
}

fn list_todos(store: Arc<Mutex<TodoStore>>) -> PluginFunction {
    let descriptor = FunctionDescriptor::new("list_todos", "List to-do items")
        .with_parameter(
            ParameterSpec::new("includeCompleted", ParamKind::Boolean).with_default("false"),
        );

    PluginFunction::sync(descriptor, move |args| {
        let include_completed = args.boolean("includeCompleted")?;
        let store = lock(&store)?;

        let lines: Vec<String> = store
            .todos
            .iter()
            .filter(|t| include_completed || !t.completed)
            .map(|t| {
                let mark = if t.completed { "x" } else { " " };
                format!("[{}] {}. {} ({})", mark, t.id, t.description, t.priority)
            })
            .collect();

        if lines.is_empty() {
            Ok("No todos.".to_string())
        } else {
            Ok(lines.join("\n"))
        }
    })
}
