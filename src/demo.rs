//! Static demo content for the table and list sections.

/// One row of the demo table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub name: &'static str,
    pub surname: &'static str,
    pub country: &'static str,
    pub age: u32,
}

/// Column titles of the demo table
pub const TABLE_HEADERS: [&str; 4] = ["Nombre", "Apellido", "País", "Edad"];

const fn person(name: &'static str, surname: &'static str, country: &'static str, age: u32) -> Person {
    Person { name, surname, country, age }
}

const TABLE_BLOCK: [Person; 15] = [
    person("Juan", "garcia", "españa", 30),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("María", "perez", "portugal", 25),
    person("Pedro", "ruiz", "españa", 40),
];

/// Six repetitions of the 15-row block.
pub fn table_rows() -> Vec<Person> {
    (0..6).flat_map(|_| TABLE_BLOCK.iter().cloned()).collect()
}

/// Fifty list lines; the first two are long enough to wrap on A4.
pub fn list_lines() -> Vec<String> {
    let mut lines = vec![
        "Esta será la línea 1 de la lista, vamos a poner un texto muy largo para ver qué es lo que hace en estos casos y como podemos corregirlo.".to_string(),
        "Esta será la línea 2 de la lista, será más corta que la anterior, pero entrará bastante justo en el ancho A4.".to_string(),
    ];
    lines.extend((3..=50).map(|i| format!("Esta será la línea {} de la lista, esta entra bien.", i)));
    lines
}

/// Split `rows` into consecutive chunks of `size`; the last chunk holds the
/// remainder. A zero `size` yields no chunks.
pub fn chunk<T: Clone>(rows: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return Vec::new();
    }
    rows.chunks(size).map(|c| c.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_sizes() {
        assert_eq!(table_rows().len(), 90);
        assert_eq!(table_rows()[14].name, "Pedro");
        assert_eq!(list_lines().len(), 50);
        assert!(list_lines()[49].contains("línea 50"));
    }

    #[test]
    fn chunk_keeps_remainder() {
        let chunks = chunk(&[1, 2, 3, 4, 5, 6, 7], 3);
        assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn chunk_edge_cases() {
        assert!(chunk(&[1, 2], 0).is_empty());
        assert!(chunk::<u8>(&[], 4).is_empty());
        assert_eq!(chunk(&[1, 2], 5), vec![vec![1, 2]]);
    }
}
